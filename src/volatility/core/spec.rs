//! Model family, orders, mean model, and the θ layout they imply.
//!
//! A [`ModelSpec`] fixes the recursion (GARCH or EGARCH) and its orders;
//! together with a [`MeanModel`] it determines [`ParamLayout`], the single
//! source of truth for where each coefficient sits in θ, in the natural
//! coefficient vector, and in standard-error arrays.
//!
//! Layout (both θ and natural order):
//! `[μ (Constant mean only), ω, α_1..α_p, γ_1..γ_p (EGARCH only), β_1..β_q]`.
use crate::volatility::errors::{VolError, VolResult};
use std::{fmt, ops::Range, str::FromStr};

/// Conditional-variance recursion family.
///
/// Parses case-insensitively from `"garch"` or `"egarch"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Garch,
    Egarch,
}

impl FromStr for ModelFamily {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "garch" => Ok(ModelFamily::Garch),
            "egarch" => Ok(ModelFamily::Egarch),
            _ => Err(VolError::UnknownOption { kind: "model family", name: s.to_string() }),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Garch => f.write_str("GARCH"),
            ModelFamily::Egarch => f.write_str("EGARCH"),
        }
    }
}

/// Mean equation for `ε_t = R_t − μ`.
///
/// - `Zero`: μ fixed at 0.
/// - `Constant`: μ estimated jointly with the variance parameters.
///
/// Parses case-insensitively from `"zero"` or `"constant"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeanModel {
    #[default]
    Zero,
    Constant,
}

impl MeanModel {
    pub fn is_estimated(self) -> bool {
        matches!(self, MeanModel::Constant)
    }
}

impl FromStr for MeanModel {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Ok(MeanModel::Zero),
            "constant" => Ok(MeanModel::Constant),
            _ => Err(VolError::UnknownOption { kind: "mean model", name: s.to_string() }),
        }
    }
}

/// Family plus orders. `p` is the ARCH order (lags of shocks), `q` the GARCH
/// order (lags of variance). Both are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub family: ModelFamily,
    pub p: usize,
    pub q: usize,
}

impl ModelSpec {
    /// Validated spec.
    ///
    /// # Errors
    /// `VolError::InvalidOrder` if `p == 0` or `q == 0`.
    pub fn new(family: ModelFamily, p: usize, q: usize) -> VolResult<Self> {
        if p == 0 || q == 0 {
            return Err(VolError::InvalidOrder { p, q });
        }
        Ok(ModelSpec { family, p, q })
    }

    /// `(1, 1)` model of the given family.
    pub const fn one_one(family: ModelFamily) -> Self {
        ModelSpec { family, p: 1, q: 1 }
    }

    /// Number of asymmetry coefficients: `p` for EGARCH, 0 for GARCH.
    pub fn n_gamma(&self) -> usize {
        match self.family {
            ModelFamily::Garch => 0,
            ModelFamily::Egarch => self.p,
        }
    }

    /// Longest lag the recursion looks back.
    pub fn max_lag(&self) -> usize {
        self.p.max(self.q)
    }

    pub fn layout(&self, mean: MeanModel) -> ParamLayout {
        let mu = mean.is_estimated().then_some(0);
        let omega = usize::from(mean.is_estimated());
        let alpha = omega + 1..omega + 1 + self.p;
        let gamma = alpha.end..alpha.end + self.n_gamma();
        let beta = gamma.end..gamma.end + self.q;
        let len = beta.end;
        ParamLayout { mu, omega, alpha, gamma, beta, len }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        ModelSpec::one_one(ModelFamily::Garch)
    }
}

/// Index map for θ, natural coefficient vectors, and standard errors.
///
/// `gamma` is an empty range for GARCH. `len` is the number of estimated
/// parameters `k` used by AIC/BIC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    pub mu: Option<usize>,
    pub omega: usize,
    pub alpha: Range<usize>,
    pub gamma: Range<usize>,
    pub beta: Range<usize>,
    pub len: usize,
}
