use super::{format_count, format_local, format_usd, new_table};
use crate::cli::{CostArgs, OutputFormat};
use anyhow::Result;
use breakeven::config::Config;
use breakeven::{ComparisonEngine, CostBreakdown, CostSample};
use colored::Colorize;
use comfy_table::Cell;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct CostReport<'a> {
    currency: &'a str,
    #[serde(flatten)]
    sample: &'a CostSample,
}

/// Execute the cost command
///
/// Bills every selected offering at the workload's own monthly volume
pub fn execute(cfg: &Config, args: &CostArgs) -> Result<()> {
    let catalog = cfg.load_catalog()?;
    let workload = args.workload.apply(cfg.workload_input()).validate()?;
    let selection = args.selection.resolve(&cfg.providers, &catalog);

    info!(
        invocations = workload.monthly_invocations(),
        "Calculating monthly costs"
    );
    let sample = ComparisonEngine::new(&catalog).cost_at(&workload, &selection)?;
    let code = cfg.currency.code.as_str();

    match args.format {
        OutputFormat::Json => {
            let report = CostReport {
                currency: code,
                sample: &sample,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => render(&sample, code),
    }

    Ok(())
}

fn render(sample: &CostSample, code: &str) {
    println!(
        "{} {} invocations/month",
        "Monthly cost at".bold(),
        format_count(sample.monthly_invocations)
    );

    let mut table = new_table(&[
        "OFFERING", "MODEL", "REQUESTS", "COMPUTE", "EGRESS", "TOTAL USD", "TOTAL LOCAL",
    ]);
    let rows = sample
        .serverless
        .iter()
        .map(|(id, cost)| (id.to_string(), "serverless", cost))
        .chain(
            sample
                .fixed_instance
                .iter()
                .map(|(key, cost)| (key.clone(), "instance", cost)),
        );
    for (name, model, cost) in rows {
        table.add_row(row(name, model, cost, code));
    }
    println!("{}", table);

    if let Some((name, _, cost)) = sample.cheapest() {
        println!(
            "{} {} at {}",
            "Cheapest:".green().bold(),
            name,
            format_usd(cost.total_cost_usd)
        );
    }
}

fn row(name: String, model: &str, cost: &CostBreakdown, code: &str) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(model),
        Cell::new(format_usd(cost.request_cost_usd)),
        Cell::new(format_usd(cost.compute_cost_usd)),
        Cell::new(format_usd(cost.egress_cost_usd)),
        Cell::new(format_usd(cost.total_cost_usd)),
        Cell::new(format_local(cost.total_cost_local, code)),
    ]
}
