//! Serverless vs. always-on comparison over a range of monthly volumes

pub mod break_even;
pub mod domain;
pub mod engine;

pub use break_even::{BreakEvenPoint, CostModel, Dominance, PairVerdict};
pub use domain::{DomainSpec, InvocationDomain, Scale, DEFAULT_DOMAIN_POINTS, MAX_DOMAIN_POINTS};
pub use engine::{
    compare_offerings, ComparisonEngine, ComparisonResult, CostSample, InstanceSelector,
    ProviderSelection,
};
