use crate::calculator::{CostBreakdown, FixedInstanceBilling, ServerlessBilling};
use crate::comparison::break_even::{find_crossings, BreakEvenPoint, CostModel, PairVerdict};
use crate::comparison::domain::InvocationDomain;
use crate::currency;
use crate::error::{CostError, Result};
use crate::pricing::{InstanceOffering, PricingCatalog, ProviderId, ServerlessOffering};
use crate::workload::{WorkloadConfig, WorkloadInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// `provider/instance_type`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceSelector {
    pub provider: ProviderId,
    pub instance_type: String,
}

impl std::str::FromStr for InstanceSelector {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((provider, instance_type))
                if !provider.trim().is_empty() && !instance_type.trim().is_empty() =>
            {
                Ok(Self {
                    provider: ProviderId::new(provider),
                    instance_type: instance_type.trim().to_string(),
                })
            }
            _ => Err(CostError::validation(
                "instance",
                format!("'{}' is not of the form provider/instance_type", s),
            )),
        }
    }
}

impl TryFrom<String> for InstanceSelector {
    type Error = CostError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<InstanceSelector> for String {
    fn from(selector: InstanceSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.instance_type)
    }
}

/// Offerings to compare
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSelection {
    #[serde(default)]
    pub serverless: Vec<ProviderId>,
    #[serde(default)]
    pub instances: Vec<InstanceSelector>,
}

impl ProviderSelection {
    /// Every serverless provider and instance offer in the catalog
    pub fn all(catalog: &PricingCatalog) -> Self {
        Self {
            serverless: catalog.serverless_providers().cloned().collect(),
            instances: catalog
                .instance_offers()
                .map(|offer| InstanceSelector {
                    provider: offer.provider.clone(),
                    instance_type: offer.instance_type.clone(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.serverless.is_empty() && self.instances.is_empty()
    }
}

/// Costs of every selected offering at one monthly volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSample {
    pub monthly_invocations: u64,
    pub serverless: BTreeMap<ProviderId, CostBreakdown>,
    /// Keyed by `provider/instance_type`
    pub fixed_instance: BTreeMap<String, CostBreakdown>,
}

impl CostSample {
    /// Cheapest offering at this volume; ties go to the first in key order,
    /// serverless first
    pub fn cheapest(&self) -> Option<(String, CostModel, &CostBreakdown)> {
        let serverless = self
            .serverless
            .iter()
            .map(|(id, b)| (id.to_string(), CostModel::Serverless, b));
        let fixed = self
            .fixed_instance
            .iter()
            .map(|(key, b)| (key.clone(), CostModel::FixedInstance, b));

        serverless.chain(fixed).fold(None, |best, candidate| match best {
            Some(current) if current.2.total_cost_usd <= candidate.2.total_cost_usd => {
                Some(current)
            }
            _ => Some(candidate),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub workload: WorkloadInput,
    pub samples: Vec<CostSample>,
    /// Every crossing of every pair, ordered by pair then volume
    pub break_even_points: Vec<BreakEvenPoint>,
    pub pairs: Vec<PairVerdict>,
}

/// Evaluates offerings from a catalog over a sweep of monthly volumes
pub struct ComparisonEngine<'a> {
    catalog: &'a PricingCatalog,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(catalog: &'a PricingCatalog) -> Self {
        Self { catalog }
    }

    /// Look up every selected offering, failing on the first unknown one
    pub fn resolve(
        &self,
        selection: &ProviderSelection,
    ) -> Result<(Vec<ServerlessOffering>, Vec<InstanceOffering>)> {
        if selection.is_empty() {
            return Err(CostError::validation(
                "providers",
                "at least one provider must be selected",
            ));
        }

        let mut serverless = Vec::with_capacity(selection.serverless.len());
        for provider in &selection.serverless {
            if serverless.iter().any(|o: &ServerlessOffering| &o.provider == provider) {
                continue;
            }
            serverless.push(self.catalog.serverless_offering(provider)?);
        }

        let mut instances = Vec::with_capacity(selection.instances.len());
        for selector in &selection.instances {
            let offering = self
                .catalog
                .instance_offering(&selector.provider, &selector.instance_type)?;
            if !instances.contains(&offering) {
                instances.push(offering);
            }
        }

        Ok((serverless, instances))
    }

    pub fn compare(
        &self,
        config: &WorkloadConfig,
        selection: &ProviderSelection,
        domain: &InvocationDomain,
    ) -> Result<ComparisonResult> {
        let (serverless, instances) = self.resolve(selection)?;

        let serverless: Vec<&dyn ServerlessBilling> =
            serverless.iter().map(|o| o as &dyn ServerlessBilling).collect();
        let instances: Vec<&dyn FixedInstanceBilling> =
            instances.iter().map(|o| o as &dyn FixedInstanceBilling).collect();

        compare_offerings(config, &serverless, &instances, domain)
    }

    /// Costs of the selected offerings at `config.monthly_invocations()`
    pub fn cost_at(&self, config: &WorkloadConfig, selection: &ProviderSelection) -> Result<CostSample> {
        let (serverless, instances) = self.resolve(selection)?;

        let serverless: Vec<&dyn ServerlessBilling> =
            serverless.iter().map(|o| o as &dyn ServerlessBilling).collect();
        let instances: Vec<&dyn FixedInstanceBilling> =
            instances.iter().map(|o| o as &dyn FixedInstanceBilling).collect();

        sample(config, &serverless, &instances)
    }
}

/// Compare arbitrary billing implementations over `domain`
pub fn compare_offerings(
    config: &WorkloadConfig,
    serverless: &[&dyn ServerlessBilling],
    instances: &[&dyn FixedInstanceBilling],
    domain: &InvocationDomain,
) -> Result<ComparisonResult> {
    if serverless.is_empty() && instances.is_empty() {
        return Err(CostError::validation(
            "providers",
            "at least one provider must be selected",
        ));
    }

    let samples = domain
        .points()
        .iter()
        .map(|&x| sample(&config.with_invocations(x)?, serverless, instances))
        .collect::<Result<Vec<_>>>()?;

    let (lo, hi) = (domain.min() as f64, domain.max() as f64);
    let fixed_curves: Vec<_> = instances.iter().map(|f| f.cost_curve(config)).collect();

    let mut pairs = Vec::with_capacity(serverless.len() * instances.len());
    let mut break_even_points = Vec::new();

    for s in serverless {
        let s_curve = s.cost_curve(config);

        for (f, f_curve) in instances.iter().zip(&fixed_curves) {
            let search = find_crossings(&s_curve, f_curve, lo, hi);

            let points = search
                .crossings
                .iter()
                .map(|crossing| {
                    let cost_usd = f_curve.value_at(crossing.invocations);
                    Ok(BreakEvenPoint {
                        serverless_provider: s.provider().clone(),
                        fixed_instance: f.key(),
                        invocation_count: crossing.invocations.round() as u64,
                        exact_invocations: crossing.invocations,
                        cost_usd,
                        cost_local: currency::to_local(cost_usd, config.exchange_rate())?,
                        cheaper_above: crossing.cheaper_above,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            debug!(
                serverless = %s.provider(),
                instance = %f.key(),
                crossings = points.len(),
                dominance = ?search.dominance,
                "Pair analyzed"
            );

            break_even_points.extend(points.iter().cloned());
            pairs.push(PairVerdict {
                serverless_provider: s.provider().clone(),
                fixed_instance: f.key(),
                break_even: points,
                cheaper_throughout: search.dominance,
            });
        }
    }

    debug!(
        samples = samples.len(),
        pairs = pairs.len(),
        break_even_points = break_even_points.len(),
        "Comparison finished"
    );

    Ok(ComparisonResult {
        workload: config.to_input(),
        samples,
        break_even_points,
        pairs,
    })
}

fn sample(
    workload: &WorkloadConfig,
    serverless: &[&dyn ServerlessBilling],
    instances: &[&dyn FixedInstanceBilling],
) -> Result<CostSample> {
    let mut sample = CostSample {
        monthly_invocations: workload.monthly_invocations(),
        serverless: BTreeMap::new(),
        fixed_instance: BTreeMap::new(),
    };

    for s in serverless {
        sample.serverless.insert(s.provider().clone(), s.bill(workload)?);
    }
    for f in instances {
        sample.fixed_instance.insert(f.key(), f.bill(workload)?);
    }

    Ok(sample)
}
