//! Multi-step conditional-volatility forecasts.
//!
//! Purpose
//! -------
//! Project the conditional variance of a fitted model `h` steps past the end
//! of the sample and report it in standard-deviation units, together with a
//! `degraded` flag and any warnings raised on the way.
//!
//! Key behaviors
//! -------------
//! - GARCH: unobserved `ε²_{T+k}` are replaced by their expectation
//!   `σ²_{T+k}`; for (1,1) this is `σ²_{T+k} = ω + (α+β) σ²_{T+k−1}` and
//!   converges to `ω / (1 − Σα − Σβ)`.
//! - EGARCH: step 1 is exact from the last standardized residuals. Future
//!   shock terms are replaced by `ln E[exp(α|z| + γz)] − α√(2/π)` under
//!   normality, computed in log space (see [`log_expected_shock`]).
//! - The simplified EGARCH propagation, which drops future shock terms, is
//!   computed alongside; a relative volatility deviation above
//!   [`FORECAST_DEVIATION_THRESHOLD`] is recorded as
//!   [`VolWarning::ForecastDeviation`].
//! - Any non-finite value, or a value above the variance ceiling, switches
//!   the whole path to the last in-sample volatility repeated `h` times with
//!   `degraded = true` and a [`VolWarning::ForecastDegraded`] warning.
//!
//! Conventions
//! -----------
//! - Output is per-period volatility in percent. Use
//!   [`ForecastPath::annualized`] for annual units.
//! - Forecast values below the variance floor are floored, not degraded.
use crate::volatility::{
    core::{
        data::annualize,
        guards::VarianceGuards,
        params::{EgarchParams, GarchParams, VolParams},
        recursion::E_ABS_Z,
    },
    errors::{VolError, VolResult, VolWarning},
};
use ndarray::{Array1, ArrayView1};
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// Relative deviation between the simplified and expectation-based EGARCH
/// paths above which a warning is recorded.
pub const FORECAST_DEVIATION_THRESHOLD: f64 = 0.10;

/// Last in-sample residuals and variances, oldest first, ending at time T.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeed {
    pub residuals: Array1<f64>,
    pub variances: Array1<f64>,
}

impl ForecastSeed {
    /// Validated seed.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidData` if the arrays are empty, differ in length,
    ///   or contain a non-finite residual or non-positive variance.
    pub fn new(residuals: Array1<f64>, variances: Array1<f64>) -> VolResult<Self> {
        if residuals.is_empty() || residuals.len() != variances.len() {
            return Err(VolError::InvalidData {
                index: None,
                value: residuals.len() as f64,
                reason: "forecast seed needs equal, non-empty residual and variance tails",
            });
        }
        if let Some((index, &value)) = residuals.iter().enumerate().find(|(_, v)| !v.is_finite())
        {
            return Err(VolError::InvalidData {
                index: Some(index),
                value,
                reason: "forecast seed residual must be finite",
            });
        }
        if let Some((index, &value)) =
            variances.iter().enumerate().find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(VolError::InvalidData {
                index: Some(index),
                value,
                reason: "forecast seed variance must be finite and positive",
            });
        }
        Ok(ForecastSeed { residuals, variances })
    }

    /// Seed from the last `m` entries of in-sample paths.
    ///
    /// Errors
    /// ------
    /// - See [`ForecastSeed::new`]; also fails if the paths are shorter
    ///   than `m`.
    pub fn from_tail(residuals: &[f64], variances: &[f64], m: usize) -> VolResult<Self> {
        if residuals.len() < m || variances.len() < m {
            let len = residuals.len().min(variances.len());
            return Err(VolError::InsufficientData { len, min: m });
        }
        ForecastSeed::new(
            Array1::from(residuals[residuals.len() - m..].to_vec()),
            Array1::from(variances[variances.len() - m..].to_vec()),
        )
    }

    pub fn len(&self) -> usize {
        self.variances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variances.is_empty()
    }

    /// `σ²_T`
    pub fn last_variance(&self) -> f64 {
        self.variances[self.len() - 1]
    }

    /// Index into the seed for time `T + s`, `s ≤ 0`.
    fn idx(&self, s: isize) -> usize {
        (self.len() as isize - 1 + s) as usize
    }
}

/// ForecastPath — h-step conditional volatility forecast.
///
/// - `volatility[k−1]`: forecast standard deviation for `T + k`.
/// - `variance[k−1]`: the matching variance.
/// - `degraded`: `true` when the flat fallback was used.
/// - `warnings`: degradation and EGARCH deviation notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPath {
    pub volatility: Array1<f64>,
    pub variance: Array1<f64>,
    pub degraded: bool,
    pub warnings: Vec<VolWarning>,
}

impl ForecastPath {
    fn from_variances(variance: Vec<f64>) -> Self {
        let variance = Array1::from(variance);
        let volatility = variance.mapv(f64::sqrt);
        ForecastPath { volatility, variance, degraded: false, warnings: Vec::new() }
    }

    fn flat(last_variance: f64, horizon: usize, reason: String) -> Self {
        ForecastPath {
            volatility: Array1::from_elem(horizon, last_variance.sqrt()),
            variance: Array1::from_elem(horizon, last_variance),
            degraded: true,
            warnings: vec![VolWarning::ForecastDegraded { reason }],
        }
    }

    pub fn horizon(&self) -> usize {
        self.volatility.len()
    }

    /// Volatility path scaled by `√periods_per_year`.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidPeriodsPerYear` for a non-positive factor.
    pub fn annualized(&self, periods_per_year: f64) -> VolResult<Array1<f64>> {
        annualize(self.volatility.view(), periods_per_year)
    }
}

/// Forecast `horizon` steps for either family.
///
/// Errors
/// ------
/// - `VolError::InvalidHorizon` if `horizon == 0`.
/// - `VolError::InsufficientData` if the seed is shorter than the model's
///   longest lag.
///
/// Numerical failures do not error; they produce a degraded path.
pub fn forecast(
    params: &VolParams, seed: &ForecastSeed, horizon: usize, guards: &VarianceGuards,
) -> VolResult<ForecastPath> {
    if horizon == 0 {
        return Err(VolError::InvalidHorizon { horizon });
    }
    let max_lag = params.spec().max_lag();
    if seed.len() < max_lag {
        return Err(VolError::InsufficientData { len: seed.len(), min: max_lag });
    }
    let path = match params {
        VolParams::Garch(p) => match garch_variance_path(p, seed, horizon, guards) {
            Ok(v) => ForecastPath::from_variances(v),
            Err(reason) => ForecastPath::flat(seed.last_variance(), horizon, reason),
        },
        VolParams::Egarch(p) => match egarch_variance_path(p, seed, horizon, guards, true) {
            Ok(v) => {
                let mut path = ForecastPath::from_variances(v);
                if let Ok(simple) = egarch_simplified_path(p, seed, horizon, guards) {
                    if let Some(w) = deviation_warning(path.volatility.view(), &simple) {
                        path.warnings.push(w);
                    }
                }
                path
            }
            Err(reason) => ForecastPath::flat(seed.last_variance(), horizon, reason),
        },
    };
    Ok(path)
}

/// Simplified EGARCH variance path that drops future α/γ shock terms:
/// `ln σ²_{T+k} = ω + Σ_i (observed shock terms) + Σ_j β_j ln σ²_{T+k−j}`.
///
/// Errors
/// ------
/// - A human-readable reason if the path becomes non-finite or overflows.
pub fn egarch_simplified_path(
    p: &EgarchParams, seed: &ForecastSeed, horizon: usize, guards: &VarianceGuards,
) -> Result<Vec<f64>, String> {
    egarch_variance_path(p, seed, horizon, guards, false)
}

/// `ln E[exp(a|z| + bz)]` for `z ~ N(0, 1)`:
/// `ln( exp((a+b)²/2) Φ(a+b) + exp((a−b)²/2) Φ(a−b) )`, combined in log
/// space.
pub fn log_expected_shock(a: f64, b: f64) -> f64 {
    let u = a + b;
    let v = a - b;
    log_sum_exp(0.5 * u * u + ln_norm_cdf(u), 0.5 * v * v + ln_norm_cdf(v))
}

fn ln_norm_cdf(x: f64) -> f64 {
    (0.5 * erfc(-x * FRAC_1_SQRT_2)).ln()
}

fn log_sum_exp(x: f64, y: f64) -> f64 {
    let m = x.max(y);
    if m == f64::NEG_INFINITY {
        return m;
    }
    m + ((x - m).exp() + (y - m).exp()).ln()
}

fn garch_variance_path(
    p: &GarchParams, seed: &ForecastSeed, horizon: usize, guards: &VarianceGuards,
) -> Result<Vec<f64>, String> {
    let mut path: Vec<f64> = Vec::with_capacity(horizon);
    for k in 1..=horizon as isize {
        let mut v = p.omega;
        for (i, &a) in p.alpha.iter().enumerate() {
            let s = k - (i as isize + 1);
            let e2 = if s <= 0 {
                let e = seed.residuals[seed.idx(s)];
                e * e
            } else {
                path[(s - 1) as usize]
            };
            v += a * e2;
        }
        for (j, &b) in p.beta.iter().enumerate() {
            let s = k - (j as isize + 1);
            v += b * if s <= 0 { seed.variances[seed.idx(s)] } else { path[(s - 1) as usize] };
        }
        path.push(checked_variance(v, k as usize, guards)?);
    }
    Ok(path)
}

fn egarch_variance_path(
    p: &EgarchParams, seed: &ForecastSeed, horizon: usize, guards: &VarianceGuards,
    expected_shocks: bool,
) -> Result<Vec<f64>, String> {
    let mut log_path: Vec<f64> = Vec::with_capacity(horizon);
    for k in 1..=horizon as isize {
        let mut g = p.omega;
        for (i, (&a, &c)) in p.alpha.iter().zip(p.gamma.iter()).enumerate() {
            let s = k - (i as isize + 1);
            if s <= 0 {
                let idx = seed.idx(s);
                let z = seed.residuals[idx] / seed.variances[idx].sqrt();
                g += a * (z.abs() - E_ABS_Z) + c * z;
            } else if expected_shocks {
                g += log_expected_shock(a, c) - a * E_ABS_Z;
            }
        }
        for (j, &b) in p.beta.iter().enumerate() {
            let s = k - (j as isize + 1);
            g += b * if s <= 0 {
                seed.variances[seed.idx(s)].ln()
            } else {
                log_path[(s - 1) as usize]
            };
        }
        if !g.is_finite() {
            return Err(format!("non-finite log-variance at step {k}"));
        }
        if g > guards.ceiling.ln() {
            return Err(format!("variance overflow at step {k}"));
        }
        log_path.push(guards.clamp_log(g).0);
    }
    Ok(log_path.into_iter().map(f64::exp).collect())
}

fn checked_variance(v: f64, step: usize, guards: &VarianceGuards) -> Result<f64, String> {
    if !v.is_finite() {
        return Err(format!("non-finite variance at step {step}"));
    }
    if v > guards.ceiling {
        return Err(format!("variance overflow at step {step}"));
    }
    Ok(v.max(guards.floor))
}

fn deviation_warning(full: ArrayView1<f64>, simple_var: &[f64]) -> Option<VolWarning> {
    let (step, max_relative) = full
        .iter()
        .zip(simple_var.iter())
        .enumerate()
        .map(|(k, (&f, &s))| (k + 1, (s.sqrt() - f).abs() / f))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    (max_relative > FORECAST_DEVIATION_THRESHOLD)
        .then_some(VolWarning::ForecastDeviation { max_relative, step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - GARCH one-step exactness and convergence to the long-run level.
    // - The closed-form shock expectation and EGARCH step 2.
    // - Deviation reporting and the degraded fallback.
    // -------------------------------------------------------------------------

    fn garch11() -> GarchParams {
        GarchParams::new(None, 0.05, array![0.1], array![0.85], 1, 1).unwrap()
    }

    fn seed(e: f64, h: f64) -> ForecastSeed {
        ForecastSeed::new(array![e], array![h]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // GARCH step 1 uses the last residual; long horizons reach √(ω/(1−α−β)).
    //
    // Given
    // -----
    // - ω = 0.05, α = 0.1, β = 0.85, ε_T = 2, σ²_T = 1.5.
    //
    // Expect
    // ------
    // - vol[0] = √(0.05 + 0.1·4 + 0.85·1.5).
    // - vol[299] ≈ √(0.05/0.05) = 1.
    fn garch_one_step_and_long_run() {
        // Arrange
        let params = VolParams::Garch(garch11());

        // Act
        let path = forecast(&params, &seed(2.0, 1.5), 300, &VarianceGuards::default()).unwrap();

        // Assert
        assert!(!path.degraded);
        let one_step = (0.05 + 0.4 + 0.85 * 1.5_f64).sqrt();
        assert_relative_eq!(path.volatility[0], one_step, epsilon = 1e-12);
        assert_relative_eq!(path.volatility[299], 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The shock expectation matches known special cases.
    //
    // Given
    // -----
    // - (a, b) = (0, 0), (0, 0.4), (0.3, 0).
    //
    // Expect
    // ------
    // - 0, 0.4²/2, and ln(2·exp(0.045)·Φ(0.3)).
    fn log_expected_shock_special_cases() {
        assert_relative_eq!(log_expected_shock(0.0, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(log_expected_shock(0.0, 0.4), 0.08, epsilon = 1e-12);
        let phi = 0.5 * erfc(-0.3 * FRAC_1_SQRT_2);
        let expected = (2.0 * 0.045_f64.exp() * phi).ln();
        assert_relative_eq!(log_expected_shock(0.3, 0.0), expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // EGARCH step 1 is exact and step 2 applies the closed-form expectation.
    //
    // Given
    // -----
    // - ω = −0.02, α = 0.1, γ = −0.06, β = 0.95, ε_T = −1.5, σ²_T = 1.2.
    //
    // Expect
    // ------
    // - ln σ²_{T+1} = ω + α(|z|−c) + γz + β ln 1.2,
    // - ln σ²_{T+2} = ω + ln E[exp(α|z|+γz)] − αc + β ln σ²_{T+1}.
    fn egarch_steps_follow_closed_form() {
        // Arrange
        let e = EgarchParams::new(None, -0.02, array![0.1], array![-0.06], array![0.95], 1, 1)
            .unwrap();
        let params = VolParams::Egarch(e);

        // Act
        let path = forecast(&params, &seed(-1.5, 1.2), 2, &VarianceGuards::default()).unwrap();

        // Assert
        let z = -1.5 / 1.2_f64.sqrt();
        let g1 = -0.02 + 0.1 * (z.abs() - E_ABS_Z) - 0.06 * z + 0.95 * 1.2_f64.ln();
        let g2 = -0.02 + log_expected_shock(0.1, -0.06) - 0.1 * E_ABS_Z + 0.95 * g1;
        assert_relative_eq!(path.variance[0], g1.exp(), epsilon = 1e-12);
        assert_relative_eq!(path.variance[1], g2.exp(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Large magnitude effects make the simplified path deviate, and the
    // deviation is recorded.
    //
    // Given
    // -----
    // - EGARCH with α = 0.5, γ = 0, β = 0.95, horizon 100.
    //
    // Expect
    // ------
    // - A ForecastDeviation warning with max_relative > 0.10.
    fn large_alpha_records_deviation() {
        let e = EgarchParams::new(None, 0.0, array![0.5], array![0.0], array![0.95], 1, 1).unwrap();

        let path =
            forecast(&VolParams::Egarch(e), &seed(0.5, 1.0), 100, &VarianceGuards::default())
                .unwrap();

        assert!(path.warnings.iter().any(|w| matches!(
            w,
            VolWarning::ForecastDeviation { max_relative, .. } if *max_relative > 0.10
        )));
    }

    #[test]
    // Purpose
    // -------
    // Overflow degrades to the flat last volatility.
    //
    // Given
    // -----
    // - GARCH with long-run variance 1 and a ceiling of 0.5; σ²_T = 0.25.
    //
    // Expect
    // ------
    // - degraded = true, every entry 0.5, one ForecastDegraded warning.
    fn overflow_degrades_to_flat_path() {
        let guards = VarianceGuards::new(1e-10, 0.5).unwrap();

        let path = forecast(&VolParams::Garch(garch11()), &seed(3.0, 0.25), 10, &guards).unwrap();

        assert!(path.degraded);
        assert!(path.volatility.iter().all(|v| (*v - 0.5).abs() < 1e-12));
        assert!(matches!(path.warnings.as_slice(), [VolWarning::ForecastDegraded { .. }]));
        assert!(forecast(&VolParams::Garch(garch11()), &seed(1.0, 1.0), 0, &guards).is_err());
    }
}
