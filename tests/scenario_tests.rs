/// Cost properties and workload scenarios against the built-in pricing tables
use breakeven::comparison::{CostModel, InvocationDomain, ProviderSelection};
use breakeven::pricing::{PricingCatalog, ProviderId};
use breakeven::{ComparisonEngine, ServerlessBilling, WorkloadConfig, WorkloadInput};

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

fn with_egress(kb: f64, ratio: f64) -> WorkloadConfig {
    WorkloadInput {
        egress_kb_per_request: kb,
        internet_transfer_ratio_percent: ratio,
        monthly_invocations: 50_000_000,
        ..WorkloadInput::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn test_costs_are_never_negative() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);
    let domain = InvocationDomain::log(1, 1_000_000_000, 40).unwrap();

    for config in [workload(128, 0.01, 1), workload(10_240, 900.0, 1), with_egress(512.0, 37.5)] {
        let result = engine
            .compare(&config, &ProviderSelection::all(&catalog), &domain)
            .unwrap();
        for sample in &result.samples {
            for cost in sample.serverless.values().chain(sample.fixed_instance.values()) {
                assert!(cost.request_cost_usd >= 0.0);
                assert!(cost.compute_cost_usd >= 0.0);
                assert!(cost.egress_cost_usd >= 0.0);
                assert!(cost.total_cost_usd >= 0.0);
                assert!(cost.total_cost_local >= 0.0);
            }
        }
    }
}

#[test]
fn test_request_free_tier_boundary() {
    let catalog = PricingCatalog::builtin();

    for provider in catalog.serverless_providers() {
        let offering = catalog.serverless_offering(provider).unwrap();
        let free = offering.rate.free_requests_per_month;
        let base = workload(128, 0.001, free);

        let at_limit = offering.bill(&base).unwrap();
        let above = offering.bill(&base.with_invocations(free + 1).unwrap()).unwrap();

        assert_eq!(at_limit.request_cost_usd, 0.0, "{}", provider);
        assert!(above.request_cost_usd > 0.0, "{}", provider);
    }
}

#[test]
fn test_zero_transfer_ratio_has_no_egress() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);

    for kb in [0.0, 1.0, 1024.0, 100_000.0] {
        let sample = engine
            .cost_at(&with_egress(kb, 0.0), &ProviderSelection::all(&catalog))
            .unwrap();
        for cost in sample.serverless.values().chain(sample.fixed_instance.values()) {
            assert_eq!(cost.egress_cost_usd, 0.0);
        }
    }
}

#[test]
fn test_serverless_cost_is_monotonic() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);
    let domain = InvocationDomain::log(1, 1_000_000_000, 500).unwrap();
    let config = WorkloadInput {
        memory_mb: 1024,
        duration_seconds: 0.3,
        egress_kb_per_request: 8.0,
        ..WorkloadInput::default()
    }
    .validate()
    .unwrap();

    let result = engine
        .compare(&config, &ProviderSelection::all(&catalog), &domain)
        .unwrap();

    for provider in catalog.serverless_providers() {
        let totals: Vec<f64> = result
            .samples
            .iter()
            .map(|s| s.serverless[provider].total_cost_usd)
            .collect();
        assert!(
            totals.windows(2).all(|w| w[0] <= w[1]),
            "{} is not monotonic",
            provider
        );
    }
}

#[test]
fn test_local_total_is_exact_product() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);
    let domain = InvocationDomain::log(1_000, 100_000_000, 15).unwrap();

    for rate in [100.0, 151.37, 299.99] {
        let config = WorkloadInput {
            exchange_rate: rate,
            egress_kb_per_request: 20.0,
            ..WorkloadInput::default()
        }
        .validate()
        .unwrap();

        let result = engine
            .compare(&config, &ProviderSelection::all(&catalog), &domain)
            .unwrap();
        for sample in &result.samples {
            for cost in sample.serverless.values().chain(sample.fixed_instance.values()) {
                assert_eq!(cost.total_cost_local, cost.total_cost_usd * rate);
            }
        }
        for point in &result.break_even_points {
            assert_eq!(point.cost_local, point.cost_usd * rate);
        }
    }
}

#[test]
fn test_low_volume_favours_serverless() {
    let catalog = PricingCatalog::builtin();
    let sample = ComparisonEngine::new(&catalog)
        .cost_at(&workload(128, 1.0, 100_000), &ProviderSelection::all(&catalog))
        .unwrap();

    let cheapest_instance = sample
        .fixed_instance
        .values()
        .map(|c| c.total_cost_usd)
        .fold(f64::INFINITY, f64::min);
    for (provider, cost) in &sample.serverless {
        assert!(
            cost.total_cost_usd < cheapest_instance,
            "{} costs {}",
            provider,
            cost.total_cost_usd
        );
    }
    assert_eq!(sample.cheapest().unwrap().1, CostModel::Serverless);
}

#[test]
fn test_high_volume_favours_instances() {
    let catalog = PricingCatalog::builtin();
    let sample = ComparisonEngine::new(&catalog)
        .cost_at(&workload(2048, 60.0, 100_000_000), &ProviderSelection::all(&catalog))
        .unwrap();

    let priciest_instance = sample
        .fixed_instance
        .values()
        .map(|c| c.total_cost_usd)
        .fold(0.0, f64::max);
    for cost in sample.serverless.values() {
        assert!(cost.total_cost_usd > priciest_instance);
    }
    assert_eq!(sample.cheapest().unwrap().1, CostModel::FixedInstance);
}

#[test]
fn test_break_even_lies_between_low_and_high_volume() {
    let catalog = PricingCatalog::builtin();
    let domain = InvocationDomain::from_points(vec![100_000, 100_000_000]).unwrap();
    let selection = ProviderSelection {
        serverless: vec![ProviderId::new("aws")],
        instances: vec!["aws/t3.micro".parse().unwrap()],
    };

    let result = ComparisonEngine::new(&catalog)
        .compare(&workload(128, 1.0, 100_000), &selection, &domain)
        .unwrap();

    assert_eq!(result.break_even_points.len(), 1);
    let point = &result.break_even_points[0];
    assert!(point.invocation_count > 100_000 && point.invocation_count < 100_000_000);
    assert_eq!(point.cheaper_above, CostModel::FixedInstance);
}

#[test]
fn test_full_egress_differs_only_by_egress() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);
    let selection = ProviderSelection::all(&catalog);

    let public = engine.cost_at(&with_egress(256.0, 100.0), &selection).unwrap();
    let private = engine.cost_at(&with_egress(256.0, 0.0), &selection).unwrap();

    let pairs = public
        .serverless
        .values()
        .zip(private.serverless.values())
        .chain(public.fixed_instance.values().zip(private.fixed_instance.values()));
    for (full, none) in pairs {
        assert!(full.egress_cost_usd > 0.0);
        assert_eq!(none.egress_cost_usd, 0.0);
        assert_eq!(full.request_cost_usd, none.request_cost_usd);
        assert_eq!(full.compute_cost_usd, none.compute_cost_usd);
        assert!((full.total_cost_usd - none.total_cost_usd - full.egress_cost_usd).abs() < 1e-9);
    }
}

#[test]
fn test_compare_is_idempotent() {
    let catalog = PricingCatalog::builtin();
    let engine = ComparisonEngine::new(&catalog);
    let domain = InvocationDomain::log(10_000, 1_000_000_000, 25).unwrap();
    let config = with_egress(64.0, 80.0);
    let selection = ProviderSelection::all(&catalog);

    let first = serde_json::to_string(&engine.compare(&config, &selection, &domain).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.compare(&config, &selection, &domain).unwrap()).unwrap();
    assert_eq!(first, second);
}
