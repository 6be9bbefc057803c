//! Monthly cost calculators for the two billing models
//!
//! - [`serverless`]: per-request and per-GB-second billing with free tiers
//! - [`fixed_instance`]: hourly billing for an always-on instance
//! - [`egress`]: internet data transfer, shared by both models
//!
//! Each model can also describe itself as a [`CostCurve`], the piecewise-linear
//! function of monthly invocations the break-even solver works on.

pub mod curve;
pub mod egress;
pub mod fixed_instance;
pub mod serverless;

pub use curve::{CostCurve, Hinge};

use crate::currency;
use crate::error::Result;
use crate::pricing::ProviderId;
use crate::workload::WorkloadConfig;
use serde::Serialize;

/// Average month length used for hourly billing
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Binary GB: 1 GiB = 1024 x 1024 KiB, for every provider
pub const KB_PER_GB: f64 = 1024.0 * 1024.0;

/// Monthly cost split by billing component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub request_cost_usd: f64,
    pub compute_cost_usd: f64,
    pub egress_cost_usd: f64,
    pub total_cost_usd: f64,
    pub total_cost_local: f64,
}

impl CostBreakdown {
    /// Sum the components and attach the local-currency total
    pub fn new(
        request_cost_usd: f64,
        compute_cost_usd: f64,
        egress_cost_usd: f64,
        exchange_rate: f64,
    ) -> Result<Self> {
        let total_cost_usd = request_cost_usd + compute_cost_usd + egress_cost_usd;
        Ok(Self {
            request_cost_usd,
            compute_cost_usd,
            egress_cost_usd,
            total_cost_usd,
            total_cost_local: currency::to_local(total_cost_usd, exchange_rate)?,
        })
    }
}

/// A provider's function-as-a-service billing
pub trait ServerlessBilling {
    fn provider(&self) -> &ProviderId;

    /// Cost at `workload.monthly_invocations()`
    fn bill(&self, workload: &WorkloadConfig) -> Result<CostBreakdown>;

    /// Total USD cost as a function of monthly invocations, all other
    /// workload parameters held fixed
    fn cost_curve(&self, workload: &WorkloadConfig) -> CostCurve;
}

/// A provider's always-on instance billing
pub trait FixedInstanceBilling {
    fn provider(&self) -> &ProviderId;

    fn instance_type(&self) -> &str;

    /// `provider/instance_type`
    fn key(&self) -> String {
        format!("{}/{}", self.provider(), self.instance_type())
    }

    /// Cost at `workload.monthly_invocations()`
    fn bill(&self, workload: &WorkloadConfig) -> Result<CostBreakdown>;

    fn cost_curve(&self, workload: &WorkloadConfig) -> CostCurve;
}
