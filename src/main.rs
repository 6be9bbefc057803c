use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use breakeven::{config, init_tracing};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();
    let command = args.get_command();

    if let cli::Commands::Version = command {
        println!("breakeven v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut cfg = config::load_config(&args.config)?;
    if let Some(pricing) = &args.pricing {
        cfg.catalog.path = Some(pricing.clone());
    }

    init_tracing(&cfg.logging.level, cfg.logging.format);

    // Dispatch to appropriate command handler
    match command {
        cli::Commands::Compare(compare) => commands::compare::execute(&cfg, &compare)?,
        cli::Commands::Cost(cost) => commands::cost::execute(&cfg, &cost)?,
        cli::Commands::Catalog { provider, format } => {
            commands::catalog::execute(&cfg, provider.as_ref(), format)?
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
            cli::ConfigCommands::Validate => commands::config::validate(&cfg)?,
        },
        cli::Commands::Version => {}
    }

    Ok(())
}
