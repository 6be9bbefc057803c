use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud provider identifier ("aws", "gcp", ...)
///
/// Providers are open-ended: registering a new catalog entry is enough to make
/// a provider available to the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

/// Function-as-a-service billing rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRate {
    /// USD per request above the free tier
    pub request_rate_usd: f64,
    pub compute_rate_per_gb_second_usd: f64,
    pub free_requests_per_month: u64,
    pub free_gb_seconds_per_month: f64,
}

/// An always-on virtual machine offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceOffer {
    pub provider: ProviderId,
    pub instance_type: String,
    pub hourly_rate_usd: f64,
    pub vcpu: u32,
    pub memory_gb: f64,
}

impl InstanceOffer {
    /// `provider/instance_type`, the key used in comparison results
    pub fn key(&self) -> String {
        format!("{}/{}", self.provider, self.instance_type)
    }
}

/// Internet egress pricing for one provider, always in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgressRate {
    pub rate_per_gb_usd: f64,
    pub free_gb_per_month: f64,
}

/// A serverless provider's rates bundled with its egress pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerlessOffering {
    pub provider: ProviderId,
    pub rate: PricingRate,
    pub egress: EgressRate,
}

/// An instance offer bundled with its provider's egress pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceOffering {
    pub offer: InstanceOffer,
    pub egress: EgressRate,
}
