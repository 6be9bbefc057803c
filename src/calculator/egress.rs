use crate::calculator::{Hinge, KB_PER_GB};
use crate::pricing::EgressRate;
use crate::workload::EgressProfile;

/// Monthly internet egress cost in USD
///
/// Only the share of traffic bound for the public internet is billed, and only
/// the part of it above the provider's free allowance.
pub fn calculate(
    egress_kb_per_request: f64,
    monthly_invocations: u64,
    transfer_ratio_percent: f64,
    rate: &EgressRate,
) -> f64 {
    let total_kb = egress_kb_per_request * monthly_invocations as f64 * (transfer_ratio_percent / 100.0);
    let total_gb = total_kb / KB_PER_GB;
    let billable_gb = (total_gb - rate.free_gb_per_month).max(0.0);
    billable_gb * rate.rate_per_gb_usd
}

/// [`calculate`] for a workload's egress profile
pub fn for_profile(profile: &EgressProfile, monthly_invocations: u64, rate: &EgressRate) -> f64 {
    calculate(
        profile.egress_kb_per_request,
        monthly_invocations,
        profile.internet_transfer_ratio_percent,
        rate,
    )
}

/// Billed GB of internet egress per invocation
pub fn gb_per_invocation(profile: &EgressProfile) -> f64 {
    profile.egress_kb_per_request * (profile.internet_transfer_ratio_percent / 100.0) / KB_PER_GB
}

/// Egress cost as a hinge in monthly invocations; `None` for private traffic
/// or empty payloads
pub fn hinge(profile: &EgressProfile, rate: &EgressRate) -> Option<Hinge> {
    Hinge::for_tier(
        gb_per_invocation(profile),
        rate.free_gb_per_month,
        rate.rate_per_gb_usd,
    )
}
