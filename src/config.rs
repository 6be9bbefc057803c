use crate::comparison::{DomainSpec, InvocationDomain, ProviderSelection};
use crate::currency;
use crate::pricing::{load_catalog_file, PricingCatalog};
use crate::workload::{WorkloadConfig, WorkloadInput};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub currency: CurrencyConfig,
    pub catalog: CatalogConfig,
    pub workload: WorkloadInput,
    pub domain: DomainSpec,
    /// Empty lists select everything in the catalog
    pub providers: ProviderSelection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// ISO 4217 code of the local currency, used for display only
    pub code: String,
    /// Overrides `workload.exchange_rate` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "JPY".to_string(),
            exchange_rate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Pricing override file; the built-in tables are used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Rate for local-currency amounts in a pricing file that declares none
    pub reference_exchange_rate: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            reference_exchange_rate: 150.0,
        }
    }
}

impl Config {
    /// Workload defaults with the currency section applied
    pub fn workload_input(&self) -> WorkloadInput {
        let mut input = self.workload.clone();
        if let Some(rate) = self.currency.exchange_rate {
            input.exchange_rate = rate;
        }
        input
    }

    pub fn workload_config(&self) -> crate::Result<WorkloadConfig> {
        self.workload_input().validate()
    }

    pub fn invocation_domain(&self) -> crate::Result<InvocationDomain> {
        InvocationDomain::from_spec(&self.domain)
    }

    /// Built-in tables, or the configured pricing file
    pub fn load_catalog(&self) -> crate::Result<PricingCatalog> {
        match &self.catalog.path {
            Some(path) => load_catalog_file(path, self.catalog.reference_exchange_rate),
            None => Ok(PricingCatalog::builtin()),
        }
    }
}

/// Load `path` (optional) and `BREAKEVEN__*` environment overrides
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("BREAKEVEN").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.logging.level.trim().is_empty() {
        anyhow::bail!("Logging level cannot be empty");
    }

    let code = &cfg.currency.code;
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        anyhow::bail!("Currency code '{}' must be three uppercase letters", code);
    }

    currency::to_usd(1.0, cfg.catalog.reference_exchange_rate)
        .map_err(|e| anyhow::anyhow!("catalog.reference_exchange_rate: {}", e))?;

    cfg.workload_config()
        .map_err(|e| anyhow::anyhow!("Invalid [workload] defaults: {}", e))?;
    cfg.invocation_domain()
        .map_err(|e| anyhow::anyhow!("Invalid [domain]: {}", e))?;

    if let Some(path) = &cfg.catalog.path {
        if !path.exists() {
            anyhow::bail!("Pricing file '{}' does not exist", path.display());
        }
    }

    Ok(())
}
