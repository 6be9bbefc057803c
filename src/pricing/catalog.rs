use crate::error::{CostError, Result};
use crate::pricing::models::{
    EgressRate, InstanceOffer, InstanceOffering, PricingRate, ProviderId, ServerlessOffering,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Read-only pricing tables for every known provider
///
/// Built once at startup and passed by reference to the calculators. There is
/// no interior mutability, so any number of threads may read it concurrently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PricingCatalog {
    serverless: BTreeMap<ProviderId, PricingRate>,
    instances: BTreeMap<ProviderId, BTreeMap<String, InstanceOffer>>,
    egress: BTreeMap<ProviderId, EgressRate>,
}

impl PricingCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Default on-demand rates for AWS, Google Cloud and Azure
    ///
    /// The tables are static and always pass [`CatalogBuilder::build`].
    pub fn builtin() -> Self {
        builtin_builder().assemble()
    }

    pub fn serverless_rate(&self, provider: &ProviderId) -> Result<&PricingRate> {
        self.serverless
            .get(provider)
            .ok_or_else(|| CostError::UnknownProvider(provider.to_string()))
    }

    pub fn instance_offer(&self, provider: &ProviderId, instance_type: &str) -> Result<&InstanceOffer> {
        let offers = self
            .instances
            .get(provider)
            .ok_or_else(|| CostError::UnknownProvider(provider.to_string()))?;

        offers
            .get(instance_type)
            .ok_or_else(|| CostError::UnknownInstanceType {
                provider: provider.to_string(),
                instance_type: instance_type.to_string(),
            })
    }

    pub fn egress_rate(&self, provider: &ProviderId) -> Result<&EgressRate> {
        self.egress
            .get(provider)
            .ok_or_else(|| CostError::UnknownProvider(provider.to_string()))
    }

    /// Serverless rates bundled with the provider's egress pricing
    pub fn serverless_offering(&self, provider: &ProviderId) -> Result<ServerlessOffering> {
        Ok(ServerlessOffering {
            provider: provider.clone(),
            rate: self.serverless_rate(provider)?.clone(),
            egress: self.egress_rate(provider)?.clone(),
        })
    }

    /// Instance offer bundled with the provider's egress pricing
    pub fn instance_offering(&self, provider: &ProviderId, instance_type: &str) -> Result<InstanceOffering> {
        Ok(InstanceOffering {
            offer: self.instance_offer(provider, instance_type)?.clone(),
            egress: self.egress_rate(provider)?.clone(),
        })
    }

    pub fn serverless_providers(&self) -> impl Iterator<Item = &ProviderId> {
        self.serverless.keys()
    }

    pub fn instance_offers(&self) -> impl Iterator<Item = &InstanceOffer> {
        self.instances.values().flat_map(|offers| offers.values())
    }

    /// All instance offers of one provider, ordered by instance type
    pub fn offers_for(&self, provider: &ProviderId) -> Result<Vec<&InstanceOffer>> {
        self.instances
            .get(provider)
            .map(|offers| offers.values().collect())
            .ok_or_else(|| CostError::UnknownProvider(provider.to_string()))
    }

    pub fn egress_rates(&self) -> impl Iterator<Item = (&ProviderId, &EgressRate)> {
        self.egress.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.serverless.is_empty() && self.instances.is_empty()
    }
}

/// Assembles a catalog and checks it for consistency
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: PricingCatalog,
}

impl CatalogBuilder {
    pub fn serverless(mut self, provider: impl Into<ProviderId>, rate: PricingRate) -> Self {
        self.catalog.serverless.insert(provider.into(), rate);
        self
    }

    pub fn instance(mut self, offer: InstanceOffer) -> Self {
        self.catalog
            .instances
            .entry(offer.provider.clone())
            .or_default()
            .insert(offer.instance_type.clone(), offer);
        self
    }

    pub fn egress(mut self, provider: impl Into<ProviderId>, rate: EgressRate) -> Self {
        self.catalog.egress.insert(provider.into(), rate);
        self
    }

    /// Finish the catalog, rejecting missing egress rates and negative or
    /// non-finite prices
    pub fn build(self) -> Result<PricingCatalog> {
        let catalog = self.catalog;

        for (provider, rate) in &catalog.serverless {
            check_amount(provider, "request_rate_usd", rate.request_rate_usd)?;
            check_amount(
                provider,
                "compute_rate_per_gb_second_usd",
                rate.compute_rate_per_gb_second_usd,
            )?;
            check_amount(provider, "free_gb_seconds_per_month", rate.free_gb_seconds_per_month)?;
            require_egress(&catalog, provider)?;
        }

        for (provider, offers) in &catalog.instances {
            for offer in offers.values() {
                if offer.instance_type.trim().is_empty() {
                    return Err(CostError::Catalog(format!(
                        "Instance offer for '{}' has an empty instance type",
                        provider
                    )));
                }
                check_amount(provider, "hourly_rate_usd", offer.hourly_rate_usd)?;
                check_amount(provider, "memory_gb", offer.memory_gb)?;
            }
            require_egress(&catalog, provider)?;
        }

        for (provider, rate) in &catalog.egress {
            check_amount(provider, "rate_per_gb_usd", rate.rate_per_gb_usd)?;
            check_amount(provider, "free_gb_per_month", rate.free_gb_per_month)?;
        }

        debug!(
            serverless = catalog.serverless.len(),
            instance_offers = catalog.instance_offers().count(),
            "Pricing catalog built"
        );

        Ok(catalog)
    }

    fn assemble(self) -> PricingCatalog {
        self.catalog
    }
}

fn check_amount(provider: &ProviderId, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CostError::Catalog(format!(
            "Provider '{}' has invalid {}: {}",
            provider, field, value
        )));
    }
    Ok(())
}

fn require_egress(catalog: &PricingCatalog, provider: &ProviderId) -> Result<()> {
    if !catalog.egress.contains_key(provider) {
        return Err(CostError::Catalog(format!(
            "Provider '{}' has no egress rate",
            provider
        )));
    }
    Ok(())
}

// ============================================================
// Built-in tables
// ============================================================

fn builtin_builder() -> CatalogBuilder {
    let mut builder = PricingCatalog::builder();

    for (provider, rate) in builtin_serverless_rates() {
        builder = builder.serverless(provider, rate);
    }
    for (provider, rate) in builtin_egress_rates() {
        builder = builder.egress(provider, rate);
    }
    for &(provider, instance_type, hourly_rate_usd, vcpu, memory_gb) in BUILTIN_INSTANCES {
        builder = builder.instance(InstanceOffer {
            provider: ProviderId::new(provider),
            instance_type: instance_type.to_string(),
            hourly_rate_usd,
            vcpu,
            memory_gb,
        });
    }
    builder
}

fn builtin_serverless_rates() -> [(&'static str, PricingRate); 3] {
    [
        // AWS Lambda (x86)
        (
            "aws",
            PricingRate {
                request_rate_usd: 0.000_000_2,
                compute_rate_per_gb_second_usd: 0.000_016_666_7,
                free_requests_per_month: 1_000_000,
                free_gb_seconds_per_month: 400_000.0,
            },
        ),
        // Google Cloud Functions, memory and CPU folded into one GB-second rate
        (
            "gcp",
            PricingRate {
                request_rate_usd: 0.000_000_4,
                compute_rate_per_gb_second_usd: 0.000_016_5,
                free_requests_per_month: 2_000_000,
                free_gb_seconds_per_month: 400_000.0,
            },
        ),
        // Azure Functions consumption plan
        (
            "azure",
            PricingRate {
                request_rate_usd: 0.000_000_2,
                compute_rate_per_gb_second_usd: 0.000_016,
                free_requests_per_month: 1_000_000,
                free_gb_seconds_per_month: 400_000.0,
            },
        ),
    ]
}

fn builtin_egress_rates() -> [(&'static str, EgressRate); 3] {
    [
        (
            "aws",
            EgressRate {
                rate_per_gb_usd: 0.09,
                free_gb_per_month: 100.0,
            },
        ),
        (
            "gcp",
            EgressRate {
                rate_per_gb_usd: 0.12,
                free_gb_per_month: 1.0,
            },
        ),
        (
            "azure",
            EgressRate {
                rate_per_gb_usd: 0.087,
                free_gb_per_month: 100.0,
            },
        ),
    ]
}

/// (provider, instance type, USD/hour, vCPU, memory GB)
const BUILTIN_INSTANCES: &[(&str, &str, f64, u32, f64)] = &[
    ("aws", "t3.micro", 0.0104, 2, 1.0),
    ("aws", "t3.small", 0.0208, 2, 2.0),
    ("aws", "t3.medium", 0.0416, 2, 4.0),
    ("aws", "m5.large", 0.096, 2, 8.0),
    ("gcp", "e2-micro", 0.0084, 2, 1.0),
    ("gcp", "e2-small", 0.0168, 2, 2.0),
    ("gcp", "e2-medium", 0.0335, 2, 4.0),
    ("gcp", "n2-standard-2", 0.0971, 2, 8.0),
    ("azure", "B1s", 0.0104, 1, 1.0),
    ("azure", "B1ms", 0.0207, 1, 2.0),
    ("azure", "B2s", 0.0416, 2, 4.0),
    ("azure", "D2s_v5", 0.096, 2, 8.0),
];
