use anyhow::Result;
use breakeven::config::{validate_config, Config};
use colored::Colorize;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration after file and environment overrides
pub fn show(cfg: &Config) -> Result<()> {
    info!("Rendering effective configuration");

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration and loads the pricing tables it points at
pub fn validate(cfg: &Config) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    validate_config(cfg)?;
    let catalog = cfg.load_catalog()?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {}: {}",
        "Log Level".cyan(),
        cfg.logging.level
    );
    println!(
        "  {}: {}",
        "Pricing".cyan(),
        cfg.catalog
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    println!(
        "  {}: {}",
        "Serverless Providers".cyan(),
        catalog.serverless_providers().count()
    );
    println!(
        "  {}: {}",
        "Instance Offers".cyan(),
        catalog.instance_offers().count()
    );
    println!(
        "  {}: {}",
        "Selected".cyan(),
        selection_summary(cfg)
    );

    info!("Configuration validation successful");
    Ok(())
}

fn selection_summary(cfg: &Config) -> String {
    let count = |n: usize| {
        if n == 0 {
            "all".to_string()
        } else {
            n.to_string()
        }
    };
    format!(
        "{} serverless, {} instances",
        count(cfg.providers.serverless.len()),
        count(cfg.providers.instances.len())
    )
}
