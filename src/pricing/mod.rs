pub mod catalog;
pub mod loader;
pub mod models;

pub use catalog::{CatalogBuilder, PricingCatalog};
pub use loader::{load_catalog_file, parse_catalog_toml, PricingFile};
pub use models::{
    EgressRate, InstanceOffer, InstanceOffering, PricingRate, ProviderId, ServerlessOffering,
};
