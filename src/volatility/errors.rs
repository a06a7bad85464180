//! Errors and warnings for the volatility stack (data checks, configuration,
//! parameter validation, estimation, and forecasting).
//!
//! [`VolError`] is the model-level error, [`ParamError`] covers parameter
//! construction and θ mapping, and [`VolWarning`] lists non-fatal conditions
//! that are carried in diagnostics instead of aborting a request.
//!
//! ## Conventions
//! - Indices are 0-based and refer to the sequence the caller passed in
//!   (prices for price checks, returns for return checks).
//! - Optimizer failures that are not part of the two-phase strategy are
//!   normalized to [`VolError::OptimizationFailed`].
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{optimization::errors::OptError, volatility::core::params::VolParams};

/// Result alias for volatility operations.
pub type VolResult<T> = Result<T, VolError>;

/// Result alias for parameter construction and validation.
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for preprocessing, fitting, and forecasting.
#[derive(Debug, Clone, PartialEq)]
pub enum VolError {
    // ---- Input/data validation ----
    /// Fewer returns than the hard minimum.
    InsufficientData { len: usize, min: usize },

    /// Invalid price, non-finite return, or a degenerate (zero-variance) series.
    InvalidData { index: Option<usize>, value: f64, reason: &'static str },

    // ---- Configuration ----
    /// ARCH and GARCH orders must both be at least one.
    InvalidOrder { p: usize, q: usize },

    /// Forecast horizon must be at least one.
    InvalidHorizon { horizon: usize },

    /// Variance guards must be finite with 0 < floor < ceiling.
    InvalidGuards { floor: f64, ceiling: f64, reason: &'static str },

    /// Rolling window must be ≥ 2 and no longer than the series.
    InvalidWindow { window: usize, len: usize },

    /// Annualization factor must be finite and > 0.
    InvalidPeriodsPerYear { value: f64 },

    /// A configuration string did not name a known option.
    UnknownOption { kind: &'static str, name: String },

    /// Simulation needs a positive length.
    InvalidSimulationLength { len: usize },

    // ---- Parameters ----
    /// Parameter validation failed.
    Param(ParamError),

    // ---- Estimation ----
    /// Strict attempt and relaxed retry both failed.
    FitFailed { status: String, best_effort: Option<Box<VolParams>> },

    /// Optimizer error outside the retry strategy.
    OptimizationFailed { status: String },

    /// Forecast or results requested before a successful fit.
    ModelNotFitted,
}

impl std::error::Error for VolError {}

impl std::fmt::Display for VolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            VolError::InsufficientData { len, min } => {
                write!(f, "Insufficient data: {len} returns, at least {min} required.")
            }
            VolError::InvalidData { index: Some(i), value, reason } => {
                write!(f, "Invalid data at index {i} ({value}): {reason}")
            }
            VolError::InvalidData { index: None, value, reason } => {
                write!(f, "Invalid data ({value}): {reason}")
            }
            // ---- Configuration ----
            VolError::InvalidOrder { p, q } => {
                write!(f, "Model orders must be >= 1; got p = {p}, q = {q}")
            }
            VolError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be >= 1; got {horizon}")
            }
            VolError::InvalidGuards { floor, ceiling, reason } => {
                write!(
                    f,
                    "Variance guards must satisfy 0 < floor ({floor}) < ceiling ({ceiling}); \
                     {reason}"
                )
            }
            VolError::InvalidWindow { window, len } => {
                write!(f, "Rolling window {window} is invalid for a series of length {len}")
            }
            VolError::InvalidPeriodsPerYear { value } => {
                write!(f, "Periods per year must be finite and > 0; got {value}")
            }
            VolError::UnknownOption { kind, name } => {
                write!(f, "Unknown {kind} '{name}'")
            }
            VolError::InvalidSimulationLength { len } => {
                write!(f, "Simulation length must be > 0; got {len}")
            }
            // ---- Parameters ----
            VolError::Param(err) => write!(f, "Invalid parameters: {err}"),
            // ---- Estimation ----
            VolError::FitFailed { status, best_effort } => {
                let note = if best_effort.is_some() {
                    "best-effort parameters available"
                } else {
                    "no parameters obtained"
                };
                write!(f, "Fit failed ({status}); {note}")
            }
            VolError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            VolError::ModelNotFitted => write!(f, "Model has not been fitted."),
        }
    }
}

impl From<ParamError> for VolError {
    fn from(err: ParamError) -> VolError {
        VolError::Param(err)
    }
}

impl From<OptError> for VolError {
    fn from(err: OptError) -> VolError {
        VolError::OptimizationFailed { status: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<VolError> for PyErr {
    fn from(err: VolError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Errors specific to parameter construction and validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Persistence at or beyond the stationarity boundary.
    StationarityViolated { coeff_sum: f64 },

    /// θ length does not match the model layout.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// ω must be finite (and > 0 for GARCH).
    InvalidOmega { value: f64 },

    /// α has the wrong number of lags.
    AlphaLengthMismatch { expected: usize, actual: usize },

    /// α must be finite (and ≥ 0 for GARCH).
    InvalidAlpha { index: usize, value: f64 },

    /// β has the wrong number of lags.
    BetaLengthMismatch { expected: usize, actual: usize },

    /// β must be finite (and ≥ 0 for GARCH).
    InvalidBeta { index: usize, value: f64 },

    /// γ must be finite.
    InvalidGamma { index: usize, value: f64 },

    /// μ must be finite.
    InvalidMean { value: f64 },

    /// θ entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::StationarityViolated { coeff_sum } => {
                write!(f, "Model not stationary: persistence is {coeff_sum} (>= 1 is not allowed)")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidOmega { value } => write!(f, "Invalid omega: {value}"),
            ParamError::AlphaLengthMismatch { expected, actual } => {
                write!(f, "Alpha length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidAlpha { index, value } => {
                write!(f, "Invalid alpha at lag {}: {value}", index + 1)
            }
            ParamError::BetaLengthMismatch { expected, actual } => {
                write!(f, "Beta length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidBeta { index, value } => {
                write!(f, "Invalid beta at lag {}: {value}", index + 1)
            }
            ParamError::InvalidGamma { index, value } => {
                write!(f, "Gamma at lag {} must be finite, got {value}", index + 1)
            }
            ParamError::InvalidMean { value } => write!(f, "Mean must be finite, got {value}"),
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Non-fatal conditions recorded alongside results.
#[derive(Debug, Clone, PartialEq)]
pub enum VolWarning {
    /// Series is usable but shorter than the advisory length.
    FewObservations { len: usize, advisory: usize },

    /// Missing ("no trade") price rows were dropped before differencing.
    DroppedMissingPrices { count: usize },

    /// Only the relaxed retry converged.
    LooseConvergence,

    /// The forecast fell back to repeating the last in-sample volatility.
    ForecastDegraded { reason: String },

    /// The simplified EGARCH log-space forecast deviates from the
    /// expectation-based path by more than the reporting threshold.
    ForecastDeviation { max_relative: f64, step: usize },

    /// A coefficient role could not be matched; its value is `None`.
    ParameterUnresolved { role: String },

    /// Standard errors could not be computed and are reported as NaN.
    StandardErrorsUnavailable { reason: String },
}

impl std::fmt::Display for VolWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolWarning::FewObservations { len, advisory } => {
                write!(f, "Only {len} returns; at least {advisory} are recommended")
            }
            VolWarning::DroppedMissingPrices { count } => {
                write!(f, "Dropped {count} missing price rows")
            }
            VolWarning::LooseConvergence => {
                write!(f, "Converged only after the relaxed retry")
            }
            VolWarning::ForecastDegraded { reason } => {
                write!(f, "Forecast degraded to flat last volatility: {reason}")
            }
            VolWarning::ForecastDeviation { max_relative, step } => {
                write!(
                    f,
                    "Simplified EGARCH forecast deviates by {:.1}% at step {step}",
                    100.0 * max_relative
                )
            }
            VolWarning::ParameterUnresolved { role } => {
                write!(f, "Parameter '{role}' could not be resolved")
            }
            VolWarning::StandardErrorsUnavailable { reason } => {
                write!(f, "Standard errors unavailable: {reason}")
            }
        }
    }
}
