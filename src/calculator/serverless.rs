use crate::calculator::{egress, CostBreakdown, CostCurve, Hinge, ServerlessBilling};
use crate::error::Result;
use crate::pricing::{EgressRate, PricingRate, ProviderId, ServerlessOffering};
use crate::workload::WorkloadConfig;

/// Monthly cost of running the workload as a function
///
/// The request and GB-second free tiers are separate allowances, each
/// subtracted once before its rate is applied.
pub fn calculate(
    config: &WorkloadConfig,
    rate: &PricingRate,
    egress_rate: &EgressRate,
) -> Result<CostBreakdown> {
    let invocations = config.monthly_invocations();

    let billable_requests = invocations.saturating_sub(rate.free_requests_per_month);
    let request_cost_usd = billable_requests as f64 * rate.request_rate_usd;

    let gb_seconds = config.memory_gb() * config.duration_seconds() * invocations as f64;
    let billable_gb_seconds = (gb_seconds - rate.free_gb_seconds_per_month).max(0.0);
    let compute_cost_usd = billable_gb_seconds * rate.compute_rate_per_gb_second_usd;

    let egress_cost_usd = egress::for_profile(&config.egress(), invocations, egress_rate);

    CostBreakdown::new(
        request_cost_usd,
        compute_cost_usd,
        egress_cost_usd,
        config.exchange_rate(),
    )
}

/// Serverless cost as a curve over monthly invocations
pub fn curve(config: &WorkloadConfig, rate: &PricingRate, egress_rate: &EgressRate) -> CostCurve {
    CostCurve::constant(0.0)
        .with_hinge(Hinge::for_tier(
            1.0,
            rate.free_requests_per_month as f64,
            rate.request_rate_usd,
        ))
        .with_hinge(Hinge::for_tier(
            config.gb_seconds_per_invocation(),
            rate.free_gb_seconds_per_month,
            rate.compute_rate_per_gb_second_usd,
        ))
        .with_hinge(egress::hinge(&config.egress(), egress_rate))
}

impl ServerlessBilling for ServerlessOffering {
    fn provider(&self) -> &ProviderId {
        &self.provider
    }

    fn bill(&self, workload: &WorkloadConfig) -> Result<CostBreakdown> {
        calculate(workload, &self.rate, &self.egress)
    }

    fn cost_curve(&self, workload: &WorkloadConfig) -> CostCurve {
        curve(workload, &self.rate, &self.egress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkloadInput;

    fn lambda_rate() -> PricingRate {
        PricingRate {
            request_rate_usd: 0.000_000_2,
            compute_rate_per_gb_second_usd: 0.000_016_666_7,
            free_requests_per_month: 1_000_000,
            free_gb_seconds_per_month: 400_000.0,
        }
    }

    fn no_egress() -> EgressRate {
        EgressRate {
            rate_per_gb_usd: 0.09,
            free_gb_per_month: 100.0,
        }
    }

    fn workload(memory_mb: u32, duration_seconds: f64, monthly_invocations: u64) -> WorkloadConfig {
        WorkloadInput {
            memory_mb,
            duration_seconds,
            monthly_invocations,
            ..WorkloadInput::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_everything_inside_free_tier() {
        let breakdown = calculate(&workload(128, 1.0, 100_000), &lambda_rate(), &no_egress()).unwrap();
        assert_eq!(breakdown.request_cost_usd, 0.0);
        assert_eq!(breakdown.compute_cost_usd, 0.0);
        assert_eq!(breakdown.egress_cost_usd, 0.0);
        assert_eq!(breakdown.total_cost_usd, 0.0);
        assert_eq!(breakdown.total_cost_local, 0.0);
    }

    #[test]
    fn test_request_free_tier_boundary() {
        let rate = lambda_rate();
        let at = calculate(&workload(128, 0.1, 1_000_000), &rate, &no_egress()).unwrap();
        let above = calculate(&workload(128, 0.1, 1_000_001), &rate, &no_egress()).unwrap();

        assert_eq!(at.request_cost_usd, 0.0);
        assert!(above.request_cost_usd > 0.0);
        assert_eq!(above.request_cost_usd, 0.000_000_2);
    }

    #[test]
    fn test_compute_tier_exhausted_before_request_tier() {
        // 10 GB x 60 s = 600 GB-s per call: 1000 calls blow through 400k GB-s
        // while using a tenth of a percent of the request allowance.
        let breakdown = calculate(&workload(10_240, 60.0, 1_000), &lambda_rate(), &no_egress()).unwrap();
        assert_eq!(breakdown.request_cost_usd, 0.0);
        let expected = (600_000.0 - 400_000.0) * 0.000_016_666_7;
        assert!((breakdown.compute_cost_usd - expected).abs() < 1e-9);
    }

    #[test]
    fn test_request_tier_exhausted_before_compute_tier() {
        // 128 MB x 10 ms: 5M calls are only 6250 GB-s
        let breakdown = calculate(&workload(128, 0.01, 5_000_000), &lambda_rate(), &no_egress()).unwrap();
        assert_eq!(breakdown.compute_cost_usd, 0.0);
        assert!((breakdown.request_cost_usd - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_curve_matches_calculate() {
        let rate = lambda_rate();
        let egress = no_egress();
        let base = WorkloadInput {
            memory_mb: 512,
            duration_seconds: 0.3,
            egress_kb_per_request: 40.0,
            internet_transfer_ratio_percent: 60.0,
            ..WorkloadInput::default()
        }
        .validate()
        .unwrap();
        let curve = curve(&base, &rate, &egress);

        for invocations in [1u64, 999_999, 1_000_001, 2_666_667, 50_000_000, 1_000_000_000] {
            let config = base.with_invocations(invocations).unwrap();
            let expected = calculate(&config, &rate, &egress).unwrap().total_cost_usd;
            let actual = curve.value_at(invocations as f64);
            assert!(
                (expected - actual).abs() <= 1e-9 * expected.max(1.0),
                "{} invocations: {} vs {}",
                invocations,
                expected,
                actual
            );
        }
    }

    #[test]
    fn test_offering_dispatch() {
        let offering = ServerlessOffering {
            provider: ProviderId::new("aws"),
            rate: lambda_rate(),
            egress: no_egress(),
        };
        let config = workload(1024, 1.0, 3_000_000);

        assert_eq!(offering.provider().as_str(), "aws");
        assert_eq!(
            offering.bill(&config).unwrap(),
            calculate(&config, &offering.rate, &offering.egress).unwrap()
        );
    }
}
