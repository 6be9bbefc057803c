/// Integration tests for pricing override files loaded from disk
use breakeven::comparison::{InvocationDomain, ProviderSelection};
use breakeven::config::Config;
use breakeven::pricing::{load_catalog_file, ProviderId};
use breakeven::{ComparisonEngine, WorkloadInput};
use std::io::Write;

const SAKURA: &str = r#"
reference_exchange_rate = 150.0
local_currency = "JPY"

[egress.sakura]
rate_per_gb = 0.0

[[instances]]
provider = "sakura"
instance_type = "1core-1gb"
hourly_rate = 3.0
vcpu = 1
memory_gb = 1
currency = "JPY"
"#;

fn pricing_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_local_currency_instance_is_compared_in_usd() {
    let file = pricing_file(SAKURA);
    let catalog = load_catalog_file(file.path(), 150.0).unwrap();

    let offer = catalog
        .instance_offer(&ProviderId::new("sakura"), "1core-1gb")
        .unwrap();
    assert!((offer.hourly_rate_usd - 0.02).abs() < 1e-12);

    // Built-in providers stay available next to the new one
    assert!(catalog.serverless_rate(&ProviderId::new("aws")).is_ok());

    let workload = WorkloadInput::default().validate().unwrap();
    let domain = InvocationDomain::log(10_000, 1_000_000_000, 20).unwrap();
    let selection = ProviderSelection {
        serverless: vec![ProviderId::new("aws")],
        instances: vec!["sakura/1core-1gb".parse().unwrap()],
    };

    let result = ComparisonEngine::new(&catalog)
        .compare(&workload, &selection, &domain)
        .unwrap();
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].fixed_instance, "sakura/1core-1gb");
    assert_eq!(result.break_even_points.len(), 1);
    // 3 JPY/h over 730 h at 150 JPY/USD
    assert!((result.break_even_points[0].cost_usd - 14.6).abs() < 1e-9);
}

#[test]
fn test_config_points_at_pricing_file() {
    let file = pricing_file(SAKURA);
    let cfg = Config {
        catalog: breakeven::config::CatalogConfig {
            path: Some(file.path().to_path_buf()),
            reference_exchange_rate: 150.0,
        },
        ..Config::default()
    };

    let catalog = cfg.load_catalog().unwrap();
    assert!(catalog.offers_for(&ProviderId::new("sakura")).is_ok());
}

#[test]
fn test_broken_file_is_a_catalog_error() {
    let file = pricing_file("[[instances]]\nprovider = \"x\"\n");
    let err = load_catalog_file(file.path(), 150.0).unwrap_err();
    assert_eq!(err.kind(), "catalog_error");

    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog_file(&dir.path().join("missing.toml"), 150.0).unwrap_err();
    assert_eq!(err.kind(), "catalog_error");
}
