use crate::error::{CostError, Result};
use crate::workload::{check_invocations, MAX_MONTHLY_INVOCATIONS};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of sample points in one sweep
pub const MAX_DOMAIN_POINTS: usize = 10_000;

const FIELD: &str = "invocation_domain";

/// Spacing of generated sample points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    #[default]
    Log,
}

impl std::str::FromStr for Scale {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Scale::Linear),
            "log" | "logarithmic" => Ok(Scale::Log),
            _ => Err(CostError::validation("scale", format!("unknown scale '{}'", s))),
        }
    }
}

/// Sample count when neither `step` nor `points` is given
pub const DEFAULT_DOMAIN_POINTS: usize = 25;

/// How to build a sweep: `min..=max` either every `step` invocations or in
/// `points` samples spaced on `scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSpec {
    pub min: u64,
    pub max: u64,
    pub step: Option<u64>,
    pub points: Option<usize>,
    pub scale: Scale,
}

impl Default for DomainSpec {
    fn default() -> Self {
        Self {
            min: 10_000,
            max: MAX_MONTHLY_INVOCATIONS,
            step: None,
            points: None,
            scale: Scale::Log,
        }
    }
}

/// Strictly ascending monthly invocation counts, each a valid workload volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvocationDomain {
    points: Vec<u64>,
}

impl InvocationDomain {
    pub fn from_points(points: Vec<u64>) -> Result<Self> {
        if points.is_empty() {
            return Err(CostError::validation(FIELD, "must not be empty"));
        }
        if points.len() > MAX_DOMAIN_POINTS {
            return Err(CostError::validation(
                FIELD,
                format!("must have at most {} points", MAX_DOMAIN_POINTS),
            ));
        }
        for &point in &points {
            check_invocations(FIELD, point)?;
        }
        if points.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CostError::validation(FIELD, "must be strictly ascending"));
        }

        Ok(Self { points })
    }

    pub fn from_spec(spec: &DomainSpec) -> Result<Self> {
        check_invocations(FIELD, spec.min)?;
        check_invocations(FIELD, spec.max)?;
        if spec.max < spec.min {
            return Err(CostError::validation(FIELD, "max must not be below min"));
        }

        match (spec.step, spec.points) {
            (Some(_), Some(_)) => Err(CostError::validation(
                FIELD,
                "step and points are mutually exclusive",
            )),
            (Some(step), None) => Self::stepped(spec.min, spec.max, step),
            (None, points) => {
                let points = points.unwrap_or(DEFAULT_DOMAIN_POINTS);
                match spec.scale {
                    Scale::Linear => Self::linear(spec.min, spec.max, points),
                    Scale::Log => Self::log(spec.min, spec.max, points),
                }
            }
        }
    }

    /// `min, min + step, ...` up to `max`, always ending on `max`
    pub fn stepped(min: u64, max: u64, step: u64) -> Result<Self> {
        if step == 0 {
            return Err(CostError::validation("step", "must be positive"));
        }
        if max < min {
            return Err(CostError::validation(FIELD, "max must not be below min"));
        }
        let count = (max.saturating_sub(min) / step) as usize + 1;
        if count > MAX_DOMAIN_POINTS {
            return Err(CostError::validation(
                FIELD,
                format!("step {} yields more than {} points", step, MAX_DOMAIN_POINTS),
            ));
        }

        let mut points: Vec<u64> = (0..count as u64).map(|i| min + i * step).collect();
        if points.last() != Some(&max) {
            points.push(max);
        }
        Self::from_points(points)
    }

    /// `points` evenly spaced samples from `min` to `max`
    pub fn linear(min: u64, max: u64, points: usize) -> Result<Self> {
        Self::generate(min, max, points, |t| min as f64 + (max - min) as f64 * t)
    }

    /// `points` samples from `min` to `max` with a constant ratio between
    /// neighbours; rounding collisions at the low end are merged
    pub fn log(min: u64, max: u64, points: usize) -> Result<Self> {
        let (lo, hi) = ((min as f64).ln(), (max as f64).ln());
        Self::generate(min, max, points, |t| (lo + (hi - lo) * t).exp())
    }

    fn generate(min: u64, max: u64, points: usize, at: impl Fn(f64) -> f64) -> Result<Self> {
        if max < min {
            return Err(CostError::validation(FIELD, "max must not be below min"));
        }
        if min == max {
            return Self::from_points(vec![min]);
        }
        if !(2..=MAX_DOMAIN_POINTS).contains(&points) {
            return Err(CostError::validation(
                "points",
                format!("must be between 2 and {}", MAX_DOMAIN_POINTS),
            ));
        }

        let last = points - 1;
        let mut values: Vec<u64> = (0..points)
            .map(|i| match i {
                0 => min,
                i if i == last => max,
                i => (at(i as f64 / last as f64).round() as u64).clamp(min, max),
            })
            .collect();
        values.dedup();

        Self::from_points(values)
    }

    pub fn points(&self) -> &[u64] {
        &self.points
    }

    pub fn min(&self) -> u64 {
        self.points[0]
    }

    pub fn max(&self) -> u64 {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
