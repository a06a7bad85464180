//! Variance guards for the conditional-variance recursions.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the lower and upper bounds that
//! keep `σ²_t` (and `ln σ²_t` for EGARCH) inside a numerically safe range
//! before logs, divisions, and square roots are taken.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 < floor < ceiling`, both finite.
//! - Guards clamp; they never reject. A non-finite variance is an error
//!   raised by the recursion, not something the guards repair.
//!
//! Conventions
//! -----------
//! - Defaults are `floor = 1e-10` and `ceiling = 1e12` (variance of percent
//!   returns).
use crate::volatility::errors::{VolError, VolResult};

/// Lower/upper bounds for `σ²_t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceGuards {
    /// Lower bound for `σ²_t` (strictly > 0).
    pub floor: f64,
    /// Upper bound for `σ²_t` (must be > `floor`).
    pub ceiling: f64,
}

impl VarianceGuards {
    pub const DEFAULT_FLOOR: f64 = 1e-10;
    pub const DEFAULT_CEILING: f64 = 1e12;

    /// Construct validated guards.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidGuards` when either bound is non-finite, the floor
    ///   is not strictly positive, or `floor >= ceiling`.
    pub fn new(floor: f64, ceiling: f64) -> VolResult<Self> {
        if !floor.is_finite() || !ceiling.is_finite() {
            return Err(VolError::InvalidGuards { floor, ceiling, reason: "bounds must be finite" });
        }
        if floor <= 0.0 {
            return Err(VolError::InvalidGuards {
                floor,
                ceiling,
                reason: "floor must be strictly positive",
            });
        }
        if floor >= ceiling {
            return Err(VolError::InvalidGuards {
                floor,
                ceiling,
                reason: "floor must be below ceiling",
            });
        }
        Ok(VarianceGuards { floor, ceiling })
    }

    /// Clamp a finite variance. Returns the clamped value and whether the
    /// bound was active.
    pub fn clamp(&self, h: f64) -> (f64, bool) {
        if h < self.floor {
            (self.floor, true)
        } else if h > self.ceiling {
            (self.ceiling, true)
        } else {
            (h, false)
        }
    }

    /// Clamp a finite log-variance to `[ln floor, ln ceiling]`.
    pub fn clamp_log(&self, g: f64) -> (f64, bool) {
        let (lo, hi) = (self.floor.ln(), self.ceiling.ln());
        if g < lo {
            (lo, true)
        } else if g > hi {
            (hi, true)
        } else {
            (g, false)
        }
    }
}

impl Default for VarianceGuards {
    fn default() -> Self {
        VarianceGuards { floor: Self::DEFAULT_FLOOR, ceiling: Self::DEFAULT_CEILING }
    }
}
