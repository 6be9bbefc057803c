//! Exact crossing points of two piecewise-linear cost curves
//!
//! Both billing models are sums of hinges, so their difference is linear
//! between consecutive free-tier thresholds. Each linear piece is solved in
//! closed form; nothing is interpolated from sample points.

use crate::calculator::CostCurve;
use crate::pricing::ProviderId;
use serde::Serialize;

/// Cost differences smaller than this are treated as equal
pub const COST_TOLERANCE_USD: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    Serverless,
    FixedInstance,
}

/// Which side of a pair is cheaper over the whole domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dominance {
    Serverless,
    FixedInstance,
    /// Both cost the same everywhere in the domain
    Equal,
}

/// Invocation volume at which a serverless offering and an instance offering
/// cost the same
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakEvenPoint {
    pub serverless_provider: ProviderId,
    pub fixed_instance: String,
    /// Exact crossing rounded to the nearest whole invocation
    pub invocation_count: u64,
    pub exact_invocations: f64,
    pub cost_usd: f64,
    pub cost_local: f64,
    /// The model that is cheaper just above the crossing
    pub cheaper_above: CostModel,
}

/// Outcome for one (serverless, fixed instance) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairVerdict {
    pub serverless_provider: ProviderId,
    pub fixed_instance: String,
    pub break_even: Vec<BreakEvenPoint>,
    /// Set only when the curves never cross inside the domain
    pub cheaper_throughout: Option<Dominance>,
}

/// A sign change of `serverless - fixed`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub invocations: f64,
    pub cheaper_above: CostModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossingSearch {
    pub crossings: Vec<Crossing>,
    pub dominance: Option<Dominance>,
}

/// Find every point in `[lo, hi]` where the cheaper model changes
///
/// A touch without a sign change is not a crossing. When the curves run
/// together over an interval and then separate on the other side, the
/// crossing is reported at the start of that interval.
pub fn find_crossings(serverless: &CostCurve, fixed: &CostCurve, lo: f64, hi: f64) -> CrossingSearch {
    let diff = serverless.minus(fixed);

    let mut knots: Vec<f64> = std::iter::once(lo)
        .chain(diff.breakpoints().filter(|&x| x > lo && x < hi))
        .chain(std::iter::once(hi))
        .collect();
    knots.sort_by(f64::total_cmp);
    knots.dedup();

    let mut crossings = Vec::new();
    let mut last_sign: Option<i8> = None;
    let mut seen_sign: Option<i8> = None;
    let mut mixed = false;
    let mut first_zero_since: Option<f64> = None;
    let mut prev: Option<f64> = None;

    for &x in &knots {
        let sign = sign_of(diff.value_at(x));

        if sign == 0 {
            first_zero_since.get_or_insert(x);
        } else {
            if let Some(previous) = last_sign {
                if previous != sign {
                    let at = match (first_zero_since, prev) {
                        (Some(zero), _) => Some(zero),
                        (None, Some(left)) => solve_piece(&diff, left, x),
                        (None, None) => None,
                    };
                    if let Some(at) = at {
                        crossings.push(Crossing {
                            invocations: at,
                            cheaper_above: cheaper_for(sign),
                        });
                    }
                }
            }
            match seen_sign {
                Some(seen) if seen != sign => mixed = true,
                _ => seen_sign = Some(sign),
            }
            last_sign = Some(sign);
            first_zero_since = None;
        }

        prev = Some(x);
    }

    let dominance = if mixed || !crossings.is_empty() {
        None
    } else {
        Some(match seen_sign {
            None => Dominance::Equal,
            Some(sign) if sign < 0 => Dominance::Serverless,
            Some(_) => Dominance::FixedInstance,
        })
    };

    CrossingSearch {
        crossings,
        dominance,
    }
}

/// Root of the linear piece of `diff` spanning `[left, right]`
fn solve_piece(diff: &CostCurve, left: f64, right: f64) -> Option<f64> {
    let (intercept, slope) = diff.linear_piece((left + right) / 2.0);
    if slope == 0.0 {
        return None;
    }
    Some((-intercept / slope).clamp(left, right))
}

fn sign_of(value: f64) -> i8 {
    if value > COST_TOLERANCE_USD {
        1
    } else if value < -COST_TOLERANCE_USD {
        -1
    } else {
        0
    }
}

/// Positive difference means serverless costs more, so the instance wins
fn cheaper_for(sign: i8) -> CostModel {
    if sign > 0 {
        CostModel::FixedInstance
    } else {
        CostModel::Serverless
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Hinge;

    fn linear(threshold: f64, slope_usd: f64) -> CostCurve {
        CostCurve::constant(0.0).with_hinge(Some(Hinge {
            threshold,
            slope_usd,
        }))
    }

    #[test]
    fn test_single_crossing_without_free_tier() {
        let serverless = linear(0.0, 0.000_000_2);
        let fixed = CostCurve::constant(36.5);

        let search = find_crossings(&serverless, &fixed, 1.0, 1e9);
        assert_eq!(search.crossings.len(), 1);
        assert!((search.crossings[0].invocations - 182_500_000.0).abs() < 1.0);
        assert_eq!(search.crossings[0].cheaper_above, CostModel::FixedInstance);
        assert_eq!(search.dominance, None);
    }

    #[test]
    fn test_crossing_after_free_tier() {
        // Free until 1M, then $1 per 100k: reaches $10 at 2M
        let serverless = linear(1_000_000.0, 0.000_01);
        let fixed = CostCurve::constant(10.0);

        let search = find_crossings(&serverless, &fixed, 1.0, 5_000_000.0);
        assert_eq!(search.crossings.len(), 1);
        assert!((search.crossings[0].invocations - 2_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_crossing_between_coarse_samples() {
        // Steep tier starting at 1M; samples at 1 and 10M would interpolate badly
        let serverless = CostCurve::constant(0.0)
            .with_hinge(Some(Hinge {
                threshold: 0.0,
                slope_usd: 0.000_000_1,
            }))
            .with_hinge(Some(Hinge {
                threshold: 1_000_000.0,
                slope_usd: 0.001,
            }));
        let fixed = CostCurve::constant(100.1);

        let search = find_crossings(&serverless, &fixed, 1.0, 10_000_000.0);
        assert_eq!(search.crossings.len(), 1);
        // 0.1 + 0.0010001 * (x - 1M) = 100.1
        let expected = 1_000_000.0 + 100.0 / 0.001_000_1;
        assert!((search.crossings[0].invocations - expected).abs() < 1e-3);
    }

    #[test]
    fn test_serverless_dominates() {
        let serverless = linear(1_000_000.0, 0.000_000_2);
        let fixed = CostCurve::constant(7.59);

        let search = find_crossings(&serverless, &fixed, 1.0, 10_000_000.0);
        assert!(search.crossings.is_empty());
        assert_eq!(search.dominance, Some(Dominance::Serverless));
    }

    #[test]
    fn test_fixed_dominates() {
        let serverless = CostCurve::constant(50.0);
        let fixed = CostCurve::constant(7.59);

        let search = find_crossings(&serverless, &fixed, 1.0, 10.0);
        assert_eq!(search.dominance, Some(Dominance::FixedInstance));
    }

    #[test]
    fn test_equal_curves() {
        let curve = linear(5.0, 1.0);
        let search = find_crossings(&curve, &curve.clone(), 1.0, 100.0);
        assert!(search.crossings.is_empty());
        assert_eq!(search.dominance, Some(Dominance::Equal));
    }

    #[test]
    fn test_touch_is_not_a_crossing() {
        // Serverless rises to exactly the fixed cost at the domain max
        let serverless = linear(0.0, 1.0);
        let fixed = CostCurve::constant(10.0);

        let search = find_crossings(&serverless, &fixed, 1.0, 10.0);
        assert!(search.crossings.is_empty());
        assert_eq!(search.dominance, Some(Dominance::Serverless));
    }

    #[test]
    fn test_plateau_then_separation() {
        // Equal on [10, 20], serverless more expensive afterwards
        let serverless = CostCurve::constant(0.0)
            .with_hinge(Some(Hinge {
                threshold: 0.0,
                slope_usd: 1.0,
            }))
            .with_hinge(Some(Hinge {
                threshold: 10.0,
                slope_usd: -1.0,
            }))
            .with_hinge(Some(Hinge {
                threshold: 20.0,
                slope_usd: 1.0,
            }));
        let fixed = CostCurve::constant(10.0);

        let search = find_crossings(&serverless, &fixed, 1.0, 30.0);
        assert_eq!(search.crossings.len(), 1);
        assert_eq!(search.crossings[0].invocations, 10.0);
        assert_eq!(search.crossings[0].cheaper_above, CostModel::FixedInstance);
    }

    #[test]
    fn test_two_crossings_when_instance_egress_is_steeper() {
        // Serverless: free until 100, then 1/unit.  Instance: 50 + 2/unit after 200.
        let serverless = linear(100.0, 1.0);
        let fixed = CostCurve::constant(50.0).with_hinge(Some(Hinge {
            threshold: 200.0,
            slope_usd: 2.0,
        }));

        let search = find_crossings(&serverless, &fixed, 1.0, 1_000.0);
        assert_eq!(search.crossings.len(), 2);
        assert!((search.crossings[0].invocations - 150.0).abs() < 1e-9);
        assert_eq!(search.crossings[0].cheaper_above, CostModel::FixedInstance);
        // x - 100 = 50 + 2(x - 200)  =>  x = 250
        assert!((search.crossings[1].invocations - 250.0).abs() < 1e-9);
        assert_eq!(search.crossings[1].cheaper_above, CostModel::Serverless);
    }
}
