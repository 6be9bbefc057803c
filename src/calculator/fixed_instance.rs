use crate::calculator::{egress, CostBreakdown, CostCurve, FixedInstanceBilling, HOURS_PER_MONTH};
use crate::error::Result;
use crate::pricing::{EgressRate, InstanceOffer, InstanceOffering, ProviderId};
use crate::workload::{EgressProfile, WorkloadConfig};

/// Uptime cost of one always-on instance, independent of traffic
pub fn monthly_compute_cost(offer: &InstanceOffer) -> f64 {
    offer.hourly_rate_usd * HOURS_PER_MONTH
}

/// Monthly cost of serving `monthly_invocations` from an always-on instance
///
/// There is no per-request charge; egress is billed exactly as for the
/// serverless model so both are compared over the same traffic.
pub fn calculate(
    offer: &InstanceOffer,
    monthly_invocations: u64,
    egress: &EgressProfile,
    egress_rate: &EgressRate,
    exchange_rate: f64,
) -> Result<CostBreakdown> {
    CostBreakdown::new(
        0.0,
        monthly_compute_cost(offer),
        egress::for_profile(egress, monthly_invocations, egress_rate),
        exchange_rate,
    )
}

pub fn curve(offer: &InstanceOffer, egress: &EgressProfile, egress_rate: &EgressRate) -> CostCurve {
    CostCurve::constant(monthly_compute_cost(offer)).with_hinge(egress::hinge(egress, egress_rate))
}

impl FixedInstanceBilling for InstanceOffering {
    fn provider(&self) -> &ProviderId {
        &self.offer.provider
    }

    fn instance_type(&self) -> &str {
        &self.offer.instance_type
    }

    fn bill(&self, workload: &WorkloadConfig) -> Result<CostBreakdown> {
        calculate(
            &self.offer,
            workload.monthly_invocations(),
            &workload.egress(),
            &self.egress,
            workload.exchange_rate(),
        )
    }

    fn cost_curve(&self, workload: &WorkloadConfig) -> CostCurve {
        curve(&self.offer, &workload.egress(), &self.egress)
    }
}
