pub mod calculator;
pub mod comparison;
pub mod config;
pub mod currency;
pub mod error;
pub mod pricing;
pub mod workload;

pub use calculator::{CostBreakdown, FixedInstanceBilling, ServerlessBilling};
pub use comparison::{
    BreakEvenPoint, ComparisonEngine, ComparisonResult, CostSample, InvocationDomain,
    ProviderSelection,
};
pub use error::{CostError, Result};
pub use pricing::PricingCatalog;
pub use workload::{WorkloadConfig, WorkloadInput};

use config::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `level`. Output goes to stderr so that results
/// printed on stdout can be piped. Can only be called once per process.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}
