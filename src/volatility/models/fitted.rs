//! Fitted GARCH/EGARCH models.
//!
//! A [`FittedModel`] is a self-contained snapshot of one successful fit:
//! coefficients with standard errors, the in-sample variance path,
//! information criteria on the sample scale, the forecast seed (last
//! residuals and variances), and the diagnostics gathered while fitting.
//! Forecasting needs nothing else, so a fitted model can be moved to
//! another thread and forecast there.
use crate::{
    optimization::loglik_optimizer::FitStatus,
    volatility::{
        core::{
            data::ReturnSeries,
            diagnostics::Diagnostics,
            forecasts::{ForecastPath, ForecastSeed, forecast},
            guards::VarianceGuards,
            options::VolOptions,
            params::VolParams,
            recursion::{VarianceWorkspace, filter, log_likelihood},
            roles::CoefficientTable,
            spec::{MeanModel, ModelSpec},
        },
        errors::VolResult,
    },
};
use ndarray::{Array1, ArrayView1};

/// Result of a successful fit.
///
/// - `log_likelihood`: Gaussian log-likelihood summed over `n_obs`.
/// - `aic = 2k − 2·LL`, `bic = k·ln(n_obs) − 2·LL`, with `k` the number of
///   estimated coefficients (including μ under a constant mean).
/// - `conditional_variance[t]`: guarded in-sample `σ²_t`.
/// - `status`: `Converged` or `ConvergedLoose`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub spec: ModelSpec,
    pub mean: MeanModel,
    pub params: VolParams,
    pub coefficients: CoefficientTable,
    pub conditional_variance: Array1<f64>,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_obs: usize,
    pub status: FitStatus,
    pub diagnostics: Diagnostics,
    pub seed: ForecastSeed,
    pub guards: VarianceGuards,
    pub horizon: usize,
}

impl FittedModel {
    /// Assemble a fitted model from estimated coefficients.
    ///
    /// Errors
    /// ------
    /// - `VolError::OptimizationFailed` if the recursion fails at the
    ///   estimate.
    /// - `VolError::InsufficientData` / `InvalidData` if the seed cannot be
    ///   built from the in-sample tails.
    pub fn from_estimate(
        params: VolParams, series: &ReturnSeries, options: &VolOptions, std_errors: Array1<f64>,
        status: FitStatus, diagnostics: Diagnostics,
    ) -> VolResult<Self> {
        let n_obs = series.len();
        let mut ws = VarianceWorkspace::new(n_obs);
        filter(&params, series.returns.view(), series.sample_variance, &options.guards, &mut ws)?;
        let ll = log_likelihood(&ws);
        let k = params.layout().len;
        let (aic, bic) = information_criteria(ll, k, n_obs);
        let seed = ForecastSeed::from_tail(&ws.eps, &ws.h, params.spec().max_lag())?;
        let coefficients = CoefficientTable::new(&params, std_errors.view());

        Ok(FittedModel {
            spec: params.spec(),
            mean: params.mean_model(),
            coefficients,
            conditional_variance: Array1::from(ws.h),
            log_likelihood: ll,
            aic,
            bic,
            n_obs,
            status,
            diagnostics,
            seed,
            guards: options.guards,
            horizon: options.horizon,
            params,
        })
    }

    /// In-sample conditional standard deviations.
    pub fn conditional_volatility(&self) -> Array1<f64> {
        self.conditional_variance.mapv(f64::sqrt)
    }

    /// Standardized residuals `ε_t / σ_t` given the returns the model was
    /// fitted on.
    pub fn standardized_residuals(&self, returns: ArrayView1<f64>) -> Array1<f64> {
        let mu = self.params.mu();
        Array1::from_iter(
            returns.iter().zip(self.conditional_variance.iter()).map(|(r, h)| (r - mu) / h.sqrt()),
        )
    }

    /// Forecast `horizon` steps ahead. Forecast warnings are returned on the
    /// path and not added to the model's own diagnostics.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidHorizon` if `horizon == 0`.
    pub fn forecast(&self, horizon: usize) -> VolResult<ForecastPath> {
        forecast(&self.params, &self.seed, horizon, &self.guards)
    }

    /// Forecast over the configured default horizon.
    pub fn default_forecast(&self) -> VolResult<ForecastPath> {
        self.forecast(self.horizon)
    }

    /// Number of estimated coefficients.
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }
}

/// `(AIC, BIC)` for a sample-scale log-likelihood with `k` coefficients.
pub fn information_criteria(log_likelihood: f64, k: usize, n_obs: usize) -> (f64, f64) {
    let k = k as f64;
    let aic = 2.0 * k - 2.0 * log_likelihood;
    let bic = k * (n_obs.max(1) as f64).ln() - 2.0 * log_likelihood;
    (aic, bic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::core::{
        params::GarchParams,
        recursion::conditional_variance,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Assembly from known coefficients: LL, AIC/BIC, seed, variance path.
    // - Forecast delegation and horizon validation.
    // -------------------------------------------------------------------------

    fn series() -> ReturnSeries {
        let r = Array1::from_shape_fn(200, |i| ((i * 37 % 23) as f64 - 11.0) / 5.0);
        ReturnSeries::from_returns(r).unwrap()
    }

    fn params() -> VolParams {
        VolParams::Garch(GarchParams::new(Some(0.1), 0.2, array![0.1], array![0.8], 1, 1).unwrap())
    }

    #[test]
    // Purpose
    // -------
    // `from_estimate` reproduces the recursion and the information criteria.
    //
    // Given
    // -----
    // - A constant-mean GARCH(1,1) (k = 4) on 200 returns.
    //
    // Expect
    // ------
    // - conditional_variance equals the standalone recursion.
    // - AIC = 8 − 2LL; BIC = 4 ln 200 − 2LL.
    // - Seed ends at the last in-sample variance.
    fn assembles_from_estimate() {
        // Arrange
        let s = series();
        let opts = VolOptions { mean: MeanModel::Constant, ..VolOptions::default() };

        // Act
        let fm = FittedModel::from_estimate(
            params(),
            &s,
            &opts,
            Array1::from_elem(4, 0.01),
            FitStatus::Converged,
            Diagnostics::default(),
        )
        .unwrap();

        // Assert
        let h = conditional_variance(&params(), s.returns.view(), s.sample_variance, &opts.guards)
            .unwrap();
        assert_eq!(fm.conditional_variance, h);
        assert_relative_eq!(fm.aic, 8.0 - 2.0 * fm.log_likelihood, epsilon = 1e-9);
        assert_relative_eq!(fm.bic, 4.0 * 200f64.ln() - 2.0 * fm.log_likelihood, epsilon = 1e-9);
        assert_eq!(fm.seed.last_variance(), h[199]);
        assert_eq!(fm.n_params(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Forecasts use the configured horizon and reject zero.
    //
    // Given
    // -----
    // - A fitted model with the default horizon 20.
    //
    // Expect
    // ------
    // - default_forecast has 20 steps; forecast(0) errors.
    fn forecast_horizons() {
        let s = series();
        let fm = FittedModel::from_estimate(
            params(),
            &s,
            &VolOptions { mean: MeanModel::Constant, ..VolOptions::default() },
            Array1::from_elem(4, f64::NAN),
            FitStatus::Converged,
            Diagnostics::default(),
        )
        .unwrap();

        assert_eq!(fm.default_forecast().unwrap().horizon(), 20);
        assert!(fm.forecast(0).is_err());
        assert_eq!(fm.standardized_residuals(s.returns.view()).len(), 200);
    }
}
