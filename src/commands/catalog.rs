use super::{format_count, new_table};
use crate::cli::OutputFormat;
use anyhow::Result;
use breakeven::config::Config;
use breakeven::pricing::{PricingCatalog, ProviderId};
use colored::Colorize;
use comfy_table::Cell;
use tracing::info;

/// Execute the catalog command
pub fn execute(cfg: &Config, provider: Option<&ProviderId>, format: OutputFormat) -> Result<()> {
    let catalog = cfg.load_catalog()?;
    let catalog = match provider {
        Some(provider) => only(&catalog, provider)?,
        None => catalog,
    };
    info!(
        serverless = catalog.serverless_providers().count(),
        instances = catalog.instance_offers().count(),
        "Catalog loaded"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Table => render(&catalog),
    }
    Ok(())
}

/// Restrict the catalog to one provider, failing if it is unknown
fn only(catalog: &PricingCatalog, provider: &ProviderId) -> Result<PricingCatalog> {
    let egress = catalog.egress_rate(provider)?.clone();
    let mut builder = PricingCatalog::builder().egress(provider.clone(), egress);
    if let Ok(rate) = catalog.serverless_rate(provider) {
        builder = builder.serverless(provider.clone(), rate.clone());
    }
    for offer in catalog.offers_for(provider).unwrap_or_default() {
        builder = builder.instance(offer.clone());
    }
    Ok(builder.build()?)
}

fn render(catalog: &PricingCatalog) {
    println!("{}", "Serverless:".bold());
    let mut table = new_table(&[
        "PROVIDER",
        "PER REQUEST",
        "PER GB-SECOND",
        "FREE REQUESTS",
        "FREE GB-SECONDS",
    ]);
    for provider in catalog.serverless_providers() {
        if let Ok(rate) = catalog.serverless_rate(provider) {
            table.add_row(vec![
                Cell::new(provider),
                Cell::new(format!("${:.10}", rate.request_rate_usd)),
                Cell::new(format!("${:.10}", rate.compute_rate_per_gb_second_usd)),
                Cell::new(format_count(rate.free_requests_per_month)),
                Cell::new(rate.free_gb_seconds_per_month),
            ]);
        }
    }
    println!("{}", table);
    println!();

    println!("{}", "Instances:".bold());
    let mut table = new_table(&["PROVIDER", "TYPE", "VCPU", "MEMORY GB", "HOURLY", "MONTHLY"]);
    for offer in catalog.instance_offers() {
        table.add_row(vec![
            Cell::new(&offer.provider),
            Cell::new(&offer.instance_type),
            Cell::new(offer.vcpu),
            Cell::new(offer.memory_gb),
            Cell::new(format!("${:.4}", offer.hourly_rate_usd)),
            Cell::new(format!(
                "${:.2}",
                breakeven::calculator::fixed_instance::monthly_compute_cost(offer)
            )),
        ]);
    }
    println!("{}", table);
    println!();

    println!("{}", "Egress:".bold());
    let mut table = new_table(&["PROVIDER", "PER GB", "FREE GB/MONTH"]);
    for (provider, rate) in catalog.egress_rates() {
        table.add_row(vec![
            Cell::new(provider),
            Cell::new(format!("${:.4}", rate.rate_per_gb_usd)),
            Cell::new(rate.free_gb_per_month),
        ]);
    }
    println!("{}", table);
}
