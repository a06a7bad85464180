//! core — return data, GARCH/EGARCH parameters, and variance recursions.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by every volatility model: the return
//! preprocessor, model specifications and parameter containers, the
//! conditional-variance recursion with its analytic score, forecast
//! propagation, starting values, coefficient roles, diagnostics, and a
//! seeded simulator. Fitting and model comparison in `volatility::models`
//! are built on top of these pieces.
//!
//! Key behaviors
//! -------------
//! - [`ReturnSeries`] turns prices into percent returns (log or simple),
//!   drops missing rows, and enforces the minimum sample size; rolling and
//!   annualized volatility plus [`SeriesSummary`] live next to it.
//! - [`ModelSpec`] / [`ParamLayout`] fix the family, orders, and the shared
//!   θ / natural coefficient layout; [`VolParams`] owns validated
//!   coefficients and maps them to and from θ.
//! - [`filter`] / [`score`] run the GARCH or EGARCH recursion over a
//!   reusable [`VarianceWorkspace`], guarded by [`VarianceGuards`].
//! - [`forecast`] propagates the fitted recursion forward from a
//!   [`ForecastSeed`]; EGARCH uses the closed-form expected shock term.
//! - [`CoefficientTable`] keys coefficients by [`Role`];
//!   [`resolve_labelled`] maps free-form labels onto the same roles.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed [`ReturnSeries`] has at least [`MIN_OBSERVATIONS`] finite
//!   returns with positive sample variance.
//! - Constructed parameters satisfy their family's constraints
//!   (GARCH: `ω > 0`, `α, β ≥ 0`, `Σα + Σβ < 1`; EGARCH: `Σ|β| < 1`).
//! - Variances leaving the recursion are finite and inside the guard
//!   interval; non-finite values are reported as errors, never clamped.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based, oldest observation first. Forecast step `k`
//!   (1-based in prose) is stored at index `k − 1`.
//! - Returns and variances are on the percent scale ([`RETURN_SCALE`]).
//! - This module performs no I/O and no logging; warnings are collected
//!   as [`VolWarning`](crate::volatility::errors::VolWarning) values.

pub mod data;
pub mod diagnostics;
pub mod forecasts;
pub mod guards;
pub mod init;
pub mod options;
pub mod params;
pub mod recursion;
pub mod roles;
pub mod simulate;
pub mod spec;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{
    DEFAULT_ROLLING_WINDOW, MIN_OBSERVATIONS, RETURN_SCALE, ReturnMethod, ReturnSeries,
    SeriesSummary, TRADING_DAYS_PER_YEAR, annualize, nan_as_missing,
};
pub use self::diagnostics::{Diagnostics, FitAttemptRecord};
pub use self::forecasts::{ForecastPath, ForecastSeed, forecast};
pub use self::guards::VarianceGuards;
pub use self::init::Init;
pub use self::options::{SimOpts, VolOptions};
pub use self::params::{EgarchParams, GarchParams, VolParams};
pub use self::recursion::{VarianceWorkspace, conditional_variance, filter, score};
pub use self::roles::{
    Coefficient, CoefficientTable, GammaResolution, MatchKind, ResolvedCoefficients, Role,
    RoleMatch, resolve_labelled,
};
pub use self::simulate::{simulate_prices, simulate_returns};
pub use self::spec::{MeanModel, ModelFamily, ModelSpec, ParamLayout};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_volatility::volatility::core::prelude::*;
//
// to import the main volatility core surface in a single line.

pub mod prelude {
    pub use super::data::{ReturnMethod, ReturnSeries, SeriesSummary};
    pub use super::forecasts::{ForecastPath, ForecastSeed};
    pub use super::guards::VarianceGuards;
    pub use super::init::Init;
    pub use super::options::{SimOpts, VolOptions};
    pub use super::params::VolParams;
    pub use super::roles::{CoefficientTable, GammaResolution, Role};
    pub use super::spec::{MeanModel, ModelFamily, ModelSpec};
}
