//! Conversion helpers for the PyO3 boundary: array extraction, price
//! extraction with missing rows, and option building from Python keyword
//! arguments.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    volatility::{
        core::{
            data::{ReturnMethod, ReturnSeries, nan_as_missing},
            guards::VarianceGuards,
            init::Init,
            options::VolOptions,
            spec::{MeanModel, ModelFamily, ModelSpec},
        },
        errors::VolError,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Prices as `Option<f64>`: Python `None` entries and `NaN` array entries
/// are kept as missing rows.
#[cfg(feature = "python-bindings")]
pub fn extract_prices<'py>(
    py: Python<'py>, raw_prices: &Bound<'py, PyAny>,
) -> PyResult<Vec<Option<f64>>> {
    if let Ok(list) = raw_prices.extract::<Vec<Option<f64>>>() {
        return Ok(list);
    }
    let arr = extract_f64_array(py, raw_prices)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err("prices must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(nan_as_missing(slice))
}

/// Return series from Python prices.
#[cfg(feature = "python-bindings")]
pub fn extract_series<'py>(
    py: Python<'py>, raw_prices: &Bound<'py, PyAny>, return_method: Option<&str>,
) -> PyResult<ReturnSeries> {
    let prices = extract_prices(py, raw_prices)?;
    let method: ReturnMethod = return_method.unwrap_or("log").parse()?;
    Ok(ReturnSeries::from_prices(&prices, method)?)
}

/// Return series from Python percent returns.
#[cfg(feature = "python-bindings")]
pub fn extract_return_series<'py>(
    py: Python<'py>, raw_returns: &Bound<'py, PyAny>,
) -> PyResult<ReturnSeries> {
    let arr = extract_f64_array(py, raw_returns)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err("returns must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(ReturnSeries::from_returns(ndarray::Array1::from(slice.to_vec()))?)
}

/// Build [`VolOptions`] from the flat Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn build_vol_options(
    model_family: &str, p: usize, q: usize, forecast_horizon: usize, mean_model: &str,
    max_iterations: usize, tolerance_relax: bool, init: Option<&str>, tol_grad: Option<f64>,
    tol_cost: Option<f64>, line_searcher: Option<&str>, verbose: bool,
    variance_guards: Option<(f64, f64)>,
) -> PyResult<VolOptions> {
    let family: ModelFamily = model_family.parse()?;
    let mean: MeanModel = mean_model.parse()?;
    let spec = ModelSpec::new(family, p, q)?;
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iterations, line_searcher, verbose)?;
    let guards = match variance_guards {
        Some((floor, ceiling)) => VarianceGuards::new(floor, ceiling)?,
        None => VarianceGuards::default(),
    };
    let init: Init = match init {
        Some(name) => name.parse()?,
        None => Init::default(),
    };
    let defaults = VolOptions::default();
    Ok(VolOptions::new(
        spec,
        mean,
        forecast_horizon,
        mle_opts,
        tolerance_relax,
        defaults.relax_factor,
        guards,
        init,
    )?)
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iterations: usize,
    line_searcher: Option<&str>, verbose: bool,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let defaults = MLEOptions::default();
    let tols = Tolerances::new(
        tol_grad.or(defaults.tols.tol_grad),
        tol_cost.or(defaults.tols.tol_cost),
        Some(max_iterations),
    )
    .map_err(VolError::from)?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(VolError::from)?,
        None => defaults.line_searcher,
    };
    let opts = MLEOptions::new(tols, ls, verbose, defaults.lbfgs_mem).map_err(VolError::from)?;
    Ok(opts)
}
