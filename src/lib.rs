//! rust_volatility — GARCH/EGARCH conditional-volatility estimation and
//! forecasting with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes volatility modelling to Python via the `_rust_volatility`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and functions used by the
//! `rust_volatility` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`volatility`, `optimization`,
//!   `inference`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_volatility` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on `volatility` (or its prelude) and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_rust_volatility` and wraps its
//!   classes in user-facing Python APIs.

pub mod inference;
pub mod optimization;
pub mod utils;
pub mod volatility;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    utils::{build_vol_options, extract_return_series, extract_series},
    volatility::{
        core::{
            data::{ReturnSeries, SeriesSummary, TRADING_DAYS_PER_YEAR, annualize},
            forecasts::ForecastPath,
            options::VolOptions,
            roles::{Role, render, resolve_labelled},
            spec::ModelFamily,
        },
        errors::VolError,
        models::{
            comparator::{ModelComparison, ModelReport, compare_models as compare_families},
            fitted::FittedModel,
            volatility_model::VolModel,
        },
    },
};

/// VolatilityModel — Python-facing wrapper for GARCH/EGARCH fits.
///
/// Purpose
/// -------
/// Expose [`VolModel`] fitting and [`FittedModel`] forecasting to Python
/// while keeping the Rust invariants and error handling.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `VolatilityModel(model_family="garch", p=1, q=1, forecast_horizon=20,
/// mean_model="zero", max_iterations=1000, tolerance_relax=True, ...)`.
///
/// Fields
/// ------
/// - `options`: validated [`VolOptions`].
/// - `fitted`: the last successful fit, if any.
/// - `series`: the return series of the last fit, for residuals and
///   summaries.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_volatility.volatility")]
pub struct VolatilityModel {
    options: VolOptions,
    fitted: Option<FittedModel>,
    series: Option<ReturnSeries>,
}

#[cfg(feature = "python-bindings")]
impl VolatilityModel {
    fn fitted(&self) -> PyResult<&FittedModel> {
        Ok(self.fitted.as_ref().ok_or(VolError::ModelNotFitted)?)
    }

    fn fit_series(&mut self, series: ReturnSeries) -> PyResult<()> {
        let fitted = VolModel::new(self.options.clone()).fit(&series)?;
        self.fitted = Some(fitted);
        self.series = Some(series);
        Ok(())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl VolatilityModel {
    #[new]
    #[pyo3(
        signature = (
            model_family = "garch",
            p = 1,
            q = 1,
            forecast_horizon = 20,
            mean_model = "zero",
            max_iterations = 1000,
            tolerance_relax = true,
            init = None,
            tol_grad = None,
            tol_cost = None,
            line_searcher = None,
            verbose = false,
            variance_guards = None,
        ),
        text_signature = "(model_family='garch', p=1, q=1, forecast_horizon=20, mean_model='zero', \
                          max_iterations=1000, tolerance_relax=True, init=None, tol_grad=None, \
                          tol_cost=None, line_searcher=None, verbose=False, variance_guards=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model_family: &str, p: usize, q: usize, forecast_horizon: usize, mean_model: &str,
        max_iterations: usize, tolerance_relax: bool, init: Option<&str>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, line_searcher: Option<&str>, verbose: bool,
        variance_guards: Option<(f64, f64)>,
    ) -> PyResult<Self> {
        let options = build_vol_options(
            model_family,
            p,
            q,
            forecast_horizon,
            mean_model,
            max_iterations,
            tolerance_relax,
            init,
            tol_grad,
            tol_cost,
            line_searcher,
            verbose,
            variance_guards,
        )?;
        Ok(VolatilityModel { options, fitted: None, series: None })
    }

    /// Fit on prices; `None` entries are dropped as no-trade rows.
    #[pyo3(
        signature = (prices, return_method = None),
        text_signature = "(self, prices, /, return_method='log')"
    )]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, prices: &Bound<'py, PyAny>, return_method: Option<&str>,
    ) -> PyResult<()> {
        let series = extract_series(py, prices, return_method)?;
        self.fit_series(series)
    }

    /// Fit on percent returns.
    pub fn fit_returns<'py>(
        &mut self, py: Python<'py>, returns: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let series = extract_return_series(py, returns)?;
        self.fit_series(series)
    }

    /// Forecast volatility path (percent per period). Uses the configured
    /// horizon when `horizon` is omitted.
    #[pyo3(signature = (horizon = None, annualize_periods = None))]
    pub fn forecast(
        &self, horizon: Option<usize>, annualize_periods: Option<f64>,
    ) -> PyResult<VolForecast> {
        let fitted = self.fitted()?;
        let path = fitted.forecast(horizon.unwrap_or(fitted.horizon))?;
        let annualized = match annualize_periods {
            Some(periods) => Some(path.annualized(periods)?.to_vec()),
            None => None,
        };
        Ok(VolForecast { inner: path, annualized })
    }

    /// `(role, value, std_error)` rows; a missing SE is `None`.
    #[getter]
    pub fn coefficients(&self) -> PyResult<Vec<(String, f64, Option<f64>)>> {
        let fitted = self.fitted()?;
        Ok(fitted
            .coefficients
            .iter()
            .map(|c| (c.role.label(), c.value, Some(c.std_error).filter(|v| v.is_finite())))
            .collect())
    }

    /// Display rows with `"N/A"` for unavailable values.
    #[getter]
    pub fn coefficient_table(&self) -> PyResult<Vec<(String, String, String)>> {
        Ok(self.fitted()?.coefficients.rows())
    }

    #[getter]
    pub fn log_likelihood(&self) -> PyResult<f64> {
        Ok(self.fitted()?.log_likelihood)
    }

    #[getter]
    pub fn aic(&self) -> PyResult<f64> {
        Ok(self.fitted()?.aic)
    }

    #[getter]
    pub fn bic(&self) -> PyResult<f64> {
        Ok(self.fitted()?.bic)
    }

    #[getter]
    pub fn n_obs(&self) -> PyResult<usize> {
        Ok(self.fitted()?.n_obs)
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.fitted()?.status.to_string())
    }

    #[getter]
    pub fn conditional_volatility(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.conditional_volatility().to_vec())
    }

    #[getter]
    pub fn annualized_conditional_volatility(&self) -> PyResult<Vec<f64>> {
        let vol = self.fitted()?.conditional_volatility();
        Ok(annualize(vol.view(), TRADING_DAYS_PER_YEAR)?.to_vec())
    }

    #[getter]
    pub fn standardized_residuals(&self) -> PyResult<Vec<f64>> {
        let fitted = self.fitted()?;
        let series = self.series.as_ref().ok_or(VolError::ModelNotFitted)?;
        Ok(fitted.standardized_residuals(series.returns.view()).to_vec())
    }

    /// Warnings from preprocessing and fitting, as readable text.
    #[getter]
    pub fn warnings(&self) -> PyResult<Vec<String>> {
        Ok(self.fitted()?.diagnostics.warnings.iter().map(|w| w.to_string()).collect())
    }

    /// `(phase, converged, status, iterations, log_likelihood, error)` per
    /// solver attempt.
    #[getter]
    #[allow(clippy::type_complexity)]
    pub fn fit_attempts(
        &self,
    ) -> PyResult<Vec<(String, bool, String, Option<usize>, Option<f64>, Option<String>)>> {
        Ok(self
            .fitted()?
            .diagnostics
            .attempts
            .iter()
            .map(|a| {
                (
                    a.phase.to_string(),
                    a.converged,
                    a.status.clone(),
                    a.iterations,
                    a.log_likelihood,
                    a.error.clone(),
                )
            })
            .collect())
    }
}

/// VolForecast — forecast path returned to Python.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_volatility.volatility")]
pub struct VolForecast {
    inner: ForecastPath,
    annualized: Option<Vec<f64>>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl VolForecast {
    #[getter]
    pub fn volatility(&self) -> Vec<f64> {
        self.inner.volatility.to_vec()
    }

    #[getter]
    pub fn variance(&self) -> Vec<f64> {
        self.inner.variance.to_vec()
    }

    #[getter]
    pub fn annualized(&self) -> Option<Vec<f64>> {
        self.annualized.clone()
    }

    #[getter]
    pub fn degraded(&self) -> bool {
        self.inner.degraded
    }

    #[getter]
    pub fn warnings(&self) -> Vec<String> {
        self.inner.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// ModelComparisonResult — GARCH vs. EGARCH summary returned to Python.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_volatility.volatility")]
pub struct ModelComparisonResult {
    inner: ModelComparison,
}

#[cfg(feature = "python-bindings")]
fn report_stats(report: &ModelReport) -> (Option<f64>, Option<f64>, Option<String>) {
    match report {
        ModelReport::Fitted(m) => (Some(m.aic), Some(m.bic), None),
        ModelReport::Failed { error, .. } => (None, None, Some(error.to_string())),
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ModelComparisonResult {
    /// `"GARCH"`, `"EGARCH"`, or `None` when both fits failed.
    #[getter]
    pub fn recommended(&self) -> Option<String> {
        self.inner.recommended.map(|f| f.to_string())
    }

    #[getter]
    pub fn aic_gap(&self) -> Option<f64> {
        self.inner.aic_gap
    }

    /// `(aic, bic, error)` for GARCH.
    #[getter]
    pub fn garch(&self) -> (Option<f64>, Option<f64>, Option<String>) {
        report_stats(&self.inner.garch)
    }

    /// `(aic, bic, error)` for EGARCH.
    #[getter]
    pub fn egarch(&self) -> (Option<f64>, Option<f64>, Option<String>) {
        report_stats(&self.inner.egarch)
    }

    /// `(aic, bic)` of the constant-variance benchmark.
    #[getter]
    pub fn baseline(&self) -> (f64, f64) {
        (self.inner.baseline.aic, self.inner.baseline.bic)
    }

    /// EGARCH asymmetry coefficient and its SE, when EGARCH fitted.
    #[getter]
    pub fn egarch_gamma(&self) -> (Option<f64>, Option<f64>) {
        match self.inner.egarch.fitted() {
            Some(m) => {
                (m.coefficients.value(Role::Gamma(1)), m.coefficients.std_error(Role::Gamma(1)))
            }
            None => (None, None),
        }
    }
}

/// Fit GARCH and EGARCH on `prices` and rank them by AIC.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        prices,
        p = 1,
        q = 1,
        mean_model = "zero",
        max_iterations = 1000,
        tolerance_relax = true,
        return_method = None,
    ),
    text_signature = "(prices, /, p=1, q=1, mean_model='zero', max_iterations=1000, \
                      tolerance_relax=True, return_method='log')"
)]
#[allow(clippy::too_many_arguments)]
pub fn compare_models<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, p: usize, q: usize, mean_model: &str,
    max_iterations: usize, tolerance_relax: bool, return_method: Option<&str>,
) -> PyResult<ModelComparisonResult> {
    let series = extract_series(py, prices, return_method)?;
    let options = build_vol_options(
        "garch",
        p,
        q,
        VolOptions::default().horizon,
        mean_model,
        max_iterations,
        tolerance_relax,
        None,
        None,
        None,
        None,
        false,
        None,
    )?;
    let inner = py.allow_threads(|| compare_families(&series, &options));
    Ok(ModelComparisonResult { inner })
}

/// Resolve labelled coefficients to `(omega, alpha, beta, gamma, warnings)`.
///
/// `gamma` is `None` for GARCH and for an unresolved EGARCH asymmetry term;
/// the warnings distinguish the two.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (coefficients, model_family = "garch"))]
#[allow(clippy::type_complexity)]
pub fn resolve_coefficients(
    coefficients: Vec<(String, f64)>, model_family: &str,
) -> PyResult<(Option<f64>, Option<f64>, Option<f64>, Option<f64>, Vec<String>)> {
    let family: ModelFamily = model_family.parse()?;
    let r = resolve_labelled(&coefficients, family);
    let gamma = r.gamma.value();
    let warnings = r.warnings.iter().map(|w| w.to_string()).collect();
    Ok((r.omega, r.alpha, r.beta, gamma, warnings))
}

/// Display string for an optional value (`"N/A"` when missing).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (value = None))]
pub fn format_value(value: Option<f64>) -> String {
    render(value)
}

/// `(current_vol, annualized_vol, mean_return, sharpe)` for a price series.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (prices, return_method = None, periods_per_year = TRADING_DAYS_PER_YEAR))]
pub fn series_summary<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, return_method: Option<&str>,
    periods_per_year: f64,
) -> PyResult<(f64, f64, f64, f64)> {
    let series = extract_series(py, prices, return_method)?;
    let s = SeriesSummary::new(&series, periods_per_year)?;
    Ok((s.current_volatility, s.annualized_volatility, s.mean_return, s.sharpe_ratio))
}

/// Trailing sample volatility of returns over `window` periods.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (prices, window = 20, return_method = None))]
pub fn rolling_volatility<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, window: usize, return_method: Option<&str>,
) -> PyResult<Vec<f64>> {
    let series = extract_series(py, prices, return_method)?;
    Ok(series.rolling_volatility(window)?.to_vec())
}

/// _rust_volatility — PyO3 module initializer for the Python extension.
///
/// Creates the `volatility` submodule, attaches it to `_rust_volatility`,
/// and registers it in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_volatility<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let volatility_mod = PyModule::new(_py, "volatility")?;
    volatility(_py, m, &volatility_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_volatility.volatility", volatility_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn volatility<'py>(
    _py: Python, rust_volatility: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<VolatilityModel>()?;
    m.add_class::<VolForecast>()?;
    m.add_class::<ModelComparisonResult>()?;
    m.add_function(wrap_pyfunction!(compare_models, m)?)?;
    m.add_function(wrap_pyfunction!(resolve_coefficients, m)?)?;
    m.add_function(wrap_pyfunction!(format_value, m)?)?;
    m.add_function(wrap_pyfunction!(series_summary, m)?)?;
    m.add_function(wrap_pyfunction!(rolling_volatility, m)?)?;
    rust_volatility.add_submodule(m)?;
    Ok(())
}
