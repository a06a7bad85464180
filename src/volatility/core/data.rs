//! Return-series preprocessing and descriptive helpers.
//!
//! Purpose
//! -------
//! Turn an ordered price sequence into the validated percentage-return series
//! that every volatility model consumes, and provide the descriptive
//! statistics shown next to a fit (rolling volatility, annualized volatility,
//! Sharpe ratio).
//!
//! Key behaviors
//! -------------
//! - [`ReturnSeries::from_prices`] drops missing ("no trade") rows, rejects
//!   non-positive or non-finite prices, differences the rest into log or
//!   simple returns scaled by 100, and enforces the length and
//!   non-degeneracy contract.
//! - [`ReturnSeries::from_returns`] applies the same contract to returns
//!   computed elsewhere.
//! - [`ReturnSeries::rolling_volatility`], [`annualize`], and
//!   [`SeriesSummary`] compute the descriptive statistics.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed [`ReturnSeries`] has at least [`MIN_OBSERVATIONS`] finite
//!   returns and a strictly positive sample variance.
//! - Fewer than [`ADVISORY_OBSERVATIONS`] returns is allowed and recorded as
//!   a [`VolWarning::FewObservations`] warning.
//! - The series is immutable after construction.
//!
//! Conventions
//! -----------
//! - Returns are in percent: `R_t = 100 · ln(P_t / P_{t−1})` (log) or
//!   `R_t = 100 · (P_t / P_{t−1} − 1)` (simple).
//! - Sample variance and standard deviation use the `n − 1` denominator.
//! - Indices in price errors refer to the caller's original price slice,
//!   including missing rows.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the 50/49 length boundary, the advisory warning,
//!   missing-row handling, invalid prices, constant prices, rolling windows,
//!   and the Sharpe ratio on a hand-computed series.
use crate::volatility::errors::{VolError, VolResult, VolWarning};
use ndarray::{Array1, ArrayView1};
use std::str::FromStr;

/// Hard minimum number of returns accepted for estimation.
pub const MIN_OBSERVATIONS: usize = 50;

/// Below this many returns a [`VolWarning::FewObservations`] is recorded.
pub const ADVISORY_OBSERVATIONS: usize = 100;

/// Returns are expressed in percent.
pub const RETURN_SCALE: f64 = 100.0;

/// Trading periods per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default trailing window for [`ReturnSeries::rolling_volatility`].
pub const DEFAULT_ROLLING_WINDOW: usize = 20;

/// Sample variances at or below this are treated as a degenerate series.
const DEGENERATE_VARIANCE: f64 = 1e-12;

/// How prices are differenced into returns.
///
/// Parses case-insensitively from `"log"` or `"simple"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMethod {
    #[default]
    Log,
    Simple,
}

impl FromStr for ReturnMethod {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(ReturnMethod::Log),
            "simple" | "pct" => Ok(ReturnMethod::Simple),
            _ => Err(VolError::UnknownOption { kind: "return method", name: s.to_string() }),
        }
    }
}

impl ReturnMethod {
    fn apply(self, prev: f64, next: f64) -> f64 {
        match self {
            ReturnMethod::Log => RETURN_SCALE * (next / prev).ln(),
            ReturnMethod::Simple => RETURN_SCALE * (next / prev - 1.0),
        }
    }
}

/// ReturnSeries — validated percentage returns for volatility estimation.
///
/// Fields
/// ------
/// - `returns`: percentage returns in time order.
/// - `sample_mean`: arithmetic mean of `returns`.
/// - `sample_variance`: `n − 1` variance of `returns`. Seeds the variance
///   recursions and the starting guesses.
/// - `warnings`: non-fatal preprocessing notes (short series, dropped rows).
///
/// Invariants
/// ----------
/// - `returns.len() >= MIN_OBSERVATIONS`.
/// - Every return is finite.
/// - `sample_variance > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub returns: Array1<f64>,
    pub sample_mean: f64,
    pub sample_variance: f64,
    pub warnings: Vec<VolWarning>,
}

impl ReturnSeries {
    /// Build a return series from prices, skipping missing rows.
    ///
    /// Parameters
    /// ----------
    /// - `prices`: ordered prices; `None` marks a row without a trade and is
    ///   dropped before differencing.
    /// - `method`: log or simple returns.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidData` for a price that is ≤ 0 or non-finite
    ///   (index into `prices`), or when the returns have zero variance.
    /// - `VolError::InsufficientData` when fewer than [`MIN_OBSERVATIONS`]
    ///   returns remain.
    pub fn from_prices(prices: &[Option<f64>], method: ReturnMethod) -> VolResult<Self> {
        let mut kept = Vec::with_capacity(prices.len());
        let mut missing = 0usize;
        for (index, entry) in prices.iter().enumerate() {
            match *entry {
                None => missing += 1,
                Some(value) if !value.is_finite() || value <= 0.0 => {
                    return Err(VolError::InvalidData {
                        index: Some(index),
                        value,
                        reason: "prices must be finite and strictly positive",
                    });
                }
                Some(value) => kept.push(value),
            }
        }

        let returns: Array1<f64> = kept.windows(2).map(|w| method.apply(w[0], w[1])).collect();
        let mut warnings = Vec::new();
        if missing > 0 {
            warnings.push(VolWarning::DroppedMissingPrices { count: missing });
        }
        Self::build(returns, warnings)
    }

    /// Build a return series from prices with no missing rows.
    ///
    /// Same contract as [`ReturnSeries::from_prices`].
    pub fn from_dense_prices(prices: &[f64], method: ReturnMethod) -> VolResult<Self> {
        let wrapped: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
        Self::from_prices(&wrapped, method)
    }

    /// Validate returns computed elsewhere (already in percent).
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidData` for a non-finite return or a zero-variance
    ///   series.
    /// - `VolError::InsufficientData` below [`MIN_OBSERVATIONS`].
    pub fn from_returns(returns: Array1<f64>) -> VolResult<Self> {
        if let Some((index, &value)) = returns.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(VolError::InvalidData {
                index: Some(index),
                value,
                reason: "returns must be finite",
            });
        }
        Self::build(returns, Vec::new())
    }

    fn build(returns: Array1<f64>, mut warnings: Vec<VolWarning>) -> VolResult<Self> {
        let len = returns.len();
        if len < MIN_OBSERVATIONS {
            return Err(VolError::InsufficientData { len, min: MIN_OBSERVATIONS });
        }
        if let Some((index, &value)) = returns.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(VolError::InvalidData {
                index: Some(index),
                value,
                reason: "non-finite return",
            });
        }
        let (sample_mean, sample_variance) = mean_and_variance(returns.view());
        if !(sample_variance > DEGENERATE_VARIANCE) {
            return Err(VolError::InvalidData {
                index: None,
                value: sample_variance,
                reason: "returns have zero variance (degenerate series)",
            });
        }
        if len < ADVISORY_OBSERVATIONS {
            warnings.push(VolWarning::FewObservations { len, advisory: ADVISORY_OBSERVATIONS });
        }
        Ok(ReturnSeries { returns, sample_mean, sample_variance, warnings })
    }

    /// Number of returns.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Always `false` for a constructed series; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Sample standard deviation of the returns.
    pub fn sample_std(&self) -> f64 {
        self.sample_variance.sqrt()
    }

    /// Trailing sample standard deviation over `window` returns.
    ///
    /// The output has `len − window + 1` entries; entry `k` covers
    /// `returns[k .. k + window]`, so the last entry is the most recent
    /// window.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidWindow` if `window < 2` or `window > len`.
    pub fn rolling_volatility(&self, window: usize) -> VolResult<Array1<f64>> {
        let len = self.len();
        if window < 2 || window > len {
            return Err(VolError::InvalidWindow { window, len });
        }
        Ok(self
            .returns
            .windows(window)
            .into_iter()
            .map(|w| mean_and_variance(w).1.sqrt())
            .collect())
    }
}

/// Price rows from a dense array where `NaN` marks a row without a trade.
///
/// `NaN` becomes `None` so [`ReturnSeries::from_prices`] drops it; infinite
/// and non-positive prices are kept and rejected there.
pub fn nan_as_missing(prices: &[f64]) -> Vec<Option<f64>> {
    prices.iter().map(|&v| if v.is_nan() { None } else { Some(v) }).collect()
}

/// Scale per-period volatilities to annual units: `x · √periods_per_year`.
///
/// Errors
/// ------
/// - `VolError::InvalidPeriodsPerYear` if `periods_per_year` is not finite
///   and positive.
pub fn annualize(values: ArrayView1<'_, f64>, periods_per_year: f64) -> VolResult<Array1<f64>> {
    let factor = annualization_factor(periods_per_year)?;
    Ok(values.mapv(|v| v * factor))
}

pub(crate) fn annualization_factor(periods_per_year: f64) -> VolResult<f64> {
    if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
        return Err(VolError::InvalidPeriodsPerYear { value: periods_per_year });
    }
    Ok(periods_per_year.sqrt())
}

/// Descriptive statistics reported next to a fit.
///
/// - `current_volatility`: sample standard deviation of the returns
///   (percent per period).
/// - `annualized_volatility`: `current_volatility · √periods_per_year`.
/// - `mean_return`: sample mean return (percent per period).
/// - `sharpe_ratio`: `mean · P / (sd · √P)` with zero risk-free rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub current_volatility: f64,
    pub annualized_volatility: f64,
    pub mean_return: f64,
    pub sharpe_ratio: f64,
}

impl SeriesSummary {
    /// Summarize `series` with `periods_per_year` periods in a year
    /// ([`TRADING_DAYS_PER_YEAR`] for daily data).
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidPeriodsPerYear` for a non-positive or non-finite
    ///   `periods_per_year`.
    pub fn new(series: &ReturnSeries, periods_per_year: f64) -> VolResult<Self> {
        let factor = annualization_factor(periods_per_year)?;
        let sd = series.sample_std();
        let mean = series.sample_mean;
        Ok(SeriesSummary {
            current_volatility: sd,
            annualized_volatility: sd * factor,
            mean_return: mean,
            sharpe_ratio: mean * periods_per_year / (sd * factor),
        })
    }
}

/// `(mean, n − 1 variance)` of a view. Single-element views have variance 0.
fn mean_and_variance(x: ArrayView1<'_, f64>) -> (f64, f64) {
    let n = x.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = x.sum() / n as f64;
    if n == 1 {
        return (mean, 0.0);
    }
    let ss: f64 = x.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, ss / (n - 1) as f64)
}
