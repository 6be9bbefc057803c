use super::{format_count, format_local, format_usd, new_table};
use crate::cli::{CompareArgs, OutputFormat};
use anyhow::Result;
use breakeven::comparison::{CostModel, Dominance};
use breakeven::config::Config;
use breakeven::{ComparisonEngine, ComparisonResult, InvocationDomain};
use colored::Colorize;
use comfy_table::{Cell, Color};
use serde::Serialize;
use tracing::info;

/// JSON document printed by `compare --format json`
#[derive(Serialize)]
struct CompareReport<'a> {
    currency: &'a str,
    #[serde(flatten)]
    result: &'a ComparisonResult,
}

/// Execute the compare command
pub fn execute(cfg: &Config, args: &CompareArgs) -> Result<()> {
    let catalog = cfg.load_catalog()?;
    let workload = args.workload.apply(cfg.workload_input()).validate()?;
    let domain = InvocationDomain::from_spec(&args.domain(&cfg.domain))?;
    let selection = args.selection.resolve(&cfg.providers, &catalog);

    info!(
        points = domain.len(),
        min = domain.min(),
        max = domain.max(),
        serverless = selection.serverless.len(),
        instances = selection.instances.len(),
        "Running comparison"
    );

    let result = ComparisonEngine::new(&catalog).compare(&workload, &selection, &domain)?;
    let code = cfg.currency.code.as_str();

    match args.format {
        OutputFormat::Json => {
            let report = CompareReport {
                currency: code,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => render(&result, code),
    }

    info!(
        break_even_points = result.break_even_points.len(),
        "Comparison completed"
    );
    Ok(())
}

fn render(result: &ComparisonResult, code: &str) {
    let w = &result.workload;
    println!("{}", "Workload:".bold());
    println!(
        "  {} MB x {} s, {} KB/request ({}% to internet), 1 USD = {} {}",
        w.memory_mb,
        w.duration_seconds,
        w.egress_kb_per_request,
        w.internet_transfer_ratio_percent,
        w.exchange_rate,
        code
    );
    println!();

    println!("{}", "Cheapest option by monthly volume:".bold());
    let mut table = new_table(&["INVOCATIONS", "CHEAPEST", "MODEL", "TOTAL USD", "TOTAL LOCAL"]);
    for sample in &result.samples {
        if let Some((name, model, cost)) = sample.cheapest() {
            table.add_row(vec![
                Cell::new(format_count(sample.monthly_invocations)),
                Cell::new(name),
                model_cell(model),
                Cell::new(format_usd(cost.total_cost_usd)),
                Cell::new(format_local(cost.total_cost_local, code)),
            ]);
        }
    }
    println!("{}", table);
    println!();

    if result.break_even_points.is_empty() {
        println!("{}", "No break-even point inside the range".yellow());
    } else {
        println!("{}", "Break-even points:".bold());
        let mut table = new_table(&[
            "SERVERLESS",
            "INSTANCE",
            "INVOCATIONS/MONTH",
            "COST USD",
            "COST LOCAL",
            "CHEAPER ABOVE",
        ]);
        for point in &result.break_even_points {
            table.add_row(vec![
                Cell::new(&point.serverless_provider),
                Cell::new(&point.fixed_instance),
                Cell::new(point.invocation_count),
                Cell::new(format_usd(point.cost_usd)),
                Cell::new(format_local(point.cost_local, code)),
                model_cell(point.cheaper_above),
            ]);
        }
        println!("{}", table);
    }

    let dominated: Vec<_> = result
        .pairs
        .iter()
        .filter_map(|pair| pair.cheaper_throughout.map(|d| (pair, d)))
        .collect();
    if !dominated.is_empty() {
        println!();
        println!("{}", "Pairs without a crossing:".bold());
        for (pair, dominance) in dominated {
            let verdict = match dominance {
                Dominance::Serverless => "serverless cheaper throughout".green(),
                Dominance::FixedInstance => "instance cheaper throughout".cyan(),
                Dominance::Equal => "equal throughout".dimmed(),
            };
            println!(
                "  {} vs {}: {}",
                pair.serverless_provider, pair.fixed_instance, verdict
            );
        }
    }
}

fn model_cell(model: CostModel) -> Cell {
    match model {
        CostModel::Serverless => Cell::new("serverless").fg(Color::Green),
        CostModel::FixedInstance => Cell::new("instance").fg(Color::Blue),
    }
}
