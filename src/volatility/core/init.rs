//! Starting-value policies for the two-phase fit.
//!
//! - [`Init::Industry`]: α = 0.05, β = 0.90, γ = 0. ω is chosen so the
//!   implied long-run variance (GARCH) or log-variance (EGARCH) equals the
//!   sample value.
//! - [`Init::Conservative`]: α = 0.10, β = 0.80, a lower-persistence start
//!   used by the relaxed retry.
//!
//! For orders above one, the α and β totals are split evenly across lags.
//! Under a constant mean, μ starts at the sample mean.
use crate::volatility::{
    core::{
        data::ReturnSeries,
        params::{EgarchParams, GarchParams, VolParams},
        spec::{MeanModel, ModelFamily, ModelSpec},
    },
    errors::{VolError, VolResult},
};
use ndarray::Array1;
use std::str::FromStr;

/// Starting-value policy.
///
/// Parses case-insensitively from `"industry"` or `"conservative"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    #[default]
    Industry,
    Conservative,
}

impl FromStr for Init {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "industry" => Ok(Init::Industry),
            "conservative" => Ok(Init::Conservative),
            _ => Err(VolError::UnknownOption { kind: "initial guess", name: s.to_string() }),
        }
    }
}

impl Init {
    /// Policy used for the relaxed retry when this one is used first.
    pub fn alternative(self) -> Init {
        match self {
            Init::Industry => Init::Conservative,
            Init::Conservative => Init::Industry,
        }
    }

    /// Total (α, β) mass before splitting across lags.
    fn totals(self) -> (f64, f64) {
        match self {
            Init::Industry => (0.05, 0.90),
            Init::Conservative => (0.10, 0.80),
        }
    }

    /// Data-driven starting coefficients.
    ///
    /// Errors
    /// ------
    /// - `VolError::Param` if the implied coefficients are invalid, which
    ///   only happens for a non-finite sample variance.
    pub fn start_params(
        self, spec: &ModelSpec, mean: MeanModel, series: &ReturnSeries,
    ) -> VolResult<VolParams> {
        let (a_total, b_total) = self.totals();
        let alpha = Array1::from_elem(spec.p, a_total / spec.p as f64);
        let beta = Array1::from_elem(spec.q, b_total / spec.q as f64);
        let mu = mean.is_estimated().then_some(series.sample_mean);
        let s2 = series.sample_variance;
        let params = match spec.family {
            ModelFamily::Garch => {
                let omega = s2 * (1.0 - a_total - b_total);
                VolParams::Garch(GarchParams::new(mu, omega, alpha, beta, spec.p, spec.q)?)
            }
            ModelFamily::Egarch => {
                let omega = (1.0 - b_total) * s2.ln();
                let gamma = Array1::zeros(spec.p);
                VolParams::Egarch(EgarchParams::new(
                    mu, omega, alpha, gamma, beta, spec.p, spec.q,
                )?)
            }
        };
        Ok(params)
    }
}
