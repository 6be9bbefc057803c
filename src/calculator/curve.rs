use serde::Serialize;

/// `slope_usd * max(0, x - threshold)`, x being monthly invocations
///
/// Every free tier in the billing models is one hinge: nothing is billed until
/// the allowance is used up, then cost grows linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hinge {
    pub threshold: f64,
    pub slope_usd: f64,
}

impl Hinge {
    /// Hinge for a quantity that grows by `per_invocation` units with every
    /// invocation, has `free_units` free, and costs `rate_usd` per unit above that
    ///
    /// Returns `None` when the quantity never grows or is never billed.
    pub fn for_tier(per_invocation: f64, free_units: f64, rate_usd: f64) -> Option<Self> {
        if per_invocation <= 0.0 || rate_usd <= 0.0 {
            return None;
        }
        Some(Self {
            threshold: free_units / per_invocation,
            slope_usd: rate_usd * per_invocation,
        })
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.slope_usd * (x - self.threshold).max(0.0)
    }
}

/// Piecewise-linear monthly cost: a constant plus a set of hinges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostCurve {
    base_usd: f64,
    hinges: Vec<Hinge>,
}

impl CostCurve {
    pub fn constant(base_usd: f64) -> Self {
        Self {
            base_usd,
            hinges: Vec::new(),
        }
    }

    pub fn with_hinge(mut self, hinge: Option<Hinge>) -> Self {
        if let Some(hinge) = hinge {
            self.hinges.push(hinge);
        }
        self
    }

    pub fn base_usd(&self) -> f64 {
        self.base_usd
    }

    pub fn hinges(&self) -> &[Hinge] {
        &self.hinges
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.base_usd + self.hinges.iter().map(|h| h.value_at(x)).sum::<f64>()
    }

    /// Thresholds where the slope changes
    pub fn breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.hinges.iter().map(|h| h.threshold)
    }

    /// `(intercept, slope)` of the linear piece containing `x`
    ///
    /// `x` should lie strictly inside a segment; at a breakpoint the piece to
    /// the left is returned.
    pub fn linear_piece(&self, x: f64) -> (f64, f64) {
        self.hinges
            .iter()
            .filter(|h| h.threshold < x)
            .fold((self.base_usd, 0.0), |(intercept, slope), h| {
                (intercept - h.slope_usd * h.threshold, slope + h.slope_usd)
            })
    }

    /// Pointwise difference `self - other`, itself piecewise linear
    pub fn minus(&self, other: &CostCurve) -> CostCurve {
        CostCurve {
            base_usd: self.base_usd - other.base_usd,
            hinges: self
                .hinges
                .iter()
                .copied()
                .chain(other.hinges.iter().map(|h| Hinge {
                    threshold: h.threshold,
                    slope_usd: -h.slope_usd,
                }))
                .collect(),
        }
    }
}
