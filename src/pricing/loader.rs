use crate::currency;
use crate::error::{CostError, Result};
use crate::pricing::catalog::{CatalogBuilder, PricingCatalog};
use crate::pricing::models::{EgressRate, InstanceOffer, PricingRate, ProviderId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Pricing override file layout
///
/// ```toml
/// reference_exchange_rate = 150.0
/// local_currency = "JPY"
///
/// [serverless.aws]
/// request_rate = 0.0000002
/// compute_rate_per_gb_second = 0.0000166667
/// free_requests_per_month = 1000000
/// free_gb_seconds_per_month = 400000
///
/// [egress.sakura]
/// rate_per_gb = 10.0
/// currency = "JPY"
///
/// [[instances]]
/// provider = "sakura"
/// instance_type = "1core-1gb"
/// hourly_rate = 2.2
/// vcpu = 1
/// memory_gb = 1
/// currency = "JPY"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingFile {
    /// Start from the built-in tables and override them entry by entry
    #[serde(default = "default_true")]
    pub include_builtin: bool,
    /// USD -> local rate used to normalize entries priced in local currency
    #[serde(default)]
    pub reference_exchange_rate: Option<f64>,
    #[serde(default = "default_local_currency")]
    pub local_currency: String,
    #[serde(default)]
    pub serverless: BTreeMap<String, ServerlessEntry>,
    #[serde(default)]
    pub egress: BTreeMap<String, EgressEntry>,
    #[serde(default)]
    pub instances: Vec<InstanceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerlessEntry {
    pub request_rate: f64,
    pub compute_rate_per_gb_second: f64,
    #[serde(default)]
    pub free_requests_per_month: u64,
    #[serde(default)]
    pub free_gb_seconds_per_month: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EgressEntry {
    pub rate_per_gb: f64,
    #[serde(default)]
    pub free_gb_per_month: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceEntry {
    pub provider: String,
    pub instance_type: String,
    pub hourly_rate: f64,
    pub vcpu: u32,
    pub memory_gb: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_local_currency() -> String {
    "JPY".to_string()
}

/// Load a pricing override file from disk
pub fn load_catalog_file(path: &Path, fallback_exchange_rate: f64) -> Result<PricingCatalog> {
    info!("Loading pricing catalog from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        CostError::Catalog(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_catalog_toml(&content, fallback_exchange_rate)
}

/// Parse a pricing override file and normalize every amount to USD
///
/// `fallback_exchange_rate` is used when the file does not carry its own
/// `reference_exchange_rate`.
pub fn parse_catalog_toml(content: &str, fallback_exchange_rate: f64) -> Result<PricingCatalog> {
    let file: PricingFile = toml::from_str(content)
        .map_err(|e| CostError::Catalog(format!("Failed to parse pricing file: {}", e)))?;

    let normalizer = Normalizer {
        local_currency: file.local_currency.to_uppercase(),
        exchange_rate: file.reference_exchange_rate.unwrap_or(fallback_exchange_rate),
    };

    let mut builder = if file.include_builtin {
        builder_from(&PricingCatalog::builtin())
    } else {
        PricingCatalog::builder()
    };

    for (provider, entry) in &file.serverless {
        let currency = entry.currency.as_deref();
        builder = builder.serverless(
            provider.as_str(),
            PricingRate {
                request_rate_usd: normalizer.to_usd(entry.request_rate, currency)?,
                compute_rate_per_gb_second_usd: normalizer
                    .to_usd(entry.compute_rate_per_gb_second, currency)?,
                free_requests_per_month: entry.free_requests_per_month,
                free_gb_seconds_per_month: entry.free_gb_seconds_per_month,
            },
        );
    }

    for (provider, entry) in &file.egress {
        builder = builder.egress(
            provider.as_str(),
            EgressRate {
                rate_per_gb_usd: normalizer.to_usd(entry.rate_per_gb, entry.currency.as_deref())?,
                free_gb_per_month: entry.free_gb_per_month,
            },
        );
    }

    for entry in &file.instances {
        builder = builder.instance(InstanceOffer {
            provider: ProviderId::new(entry.provider.as_str()),
            instance_type: entry.instance_type.clone(),
            hourly_rate_usd: normalizer.to_usd(entry.hourly_rate, entry.currency.as_deref())?,
            vcpu: entry.vcpu,
            memory_gb: entry.memory_gb,
        });
    }

    let catalog = builder.build()?;
    debug!(
        serverless = file.serverless.len(),
        egress = file.egress.len(),
        instances = file.instances.len(),
        include_builtin = file.include_builtin,
        "Parsed pricing file"
    );

    Ok(catalog)
}

fn builder_from(catalog: &PricingCatalog) -> CatalogBuilder {
    let mut builder = PricingCatalog::builder();
    for provider in catalog.serverless_providers() {
        if let Ok(rate) = catalog.serverless_rate(provider) {
            builder = builder.serverless(provider.clone(), rate.clone());
        }
    }
    for (provider, rate) in catalog.egress_rates() {
        builder = builder.egress(provider.clone(), rate.clone());
    }
    for offer in catalog.instance_offers() {
        builder = builder.instance(offer.clone());
    }
    builder
}

struct Normalizer {
    local_currency: String,
    exchange_rate: f64,
}

impl Normalizer {
    fn to_usd(&self, amount: f64, currency: Option<&str>) -> Result<f64> {
        match currency.map(str::to_uppercase) {
            None => Ok(amount),
            Some(code) if code == "USD" => Ok(amount),
            Some(code) if code == self.local_currency => {
                currency::to_usd(amount, self.exchange_rate)
            }
            Some(code) => Err(CostError::Catalog(format!(
                "Unsupported currency '{}' (expected USD or {})",
                code, self.local_currency
            ))),
        }
    }
}
