//! volatility — GARCH/EGARCH stack: return preprocessing, estimation,
//! forecasting, and model comparison.
//!
//! Purpose
//! -------
//! Provide a cohesive conditional-volatility layer that bundles return data
//! preparation, parameter types and recursions ([`core`]), fitting and
//! comparison ([`models`]), and shared error types ([`errors`]) under one
//! namespace. This is the surface most consumers, including the Python
//! bindings, depend on.
//!
//! Downstream usage
//! ----------------
//! 1. Build a [`ReturnSeries`] from prices (`ReturnSeries::from_prices`) or
//!    from percent returns.
//! 2. Configure a [`VolOptions`] (family, orders, mean model, horizon,
//!    solver tolerances) or use `VolOptions::from_config`.
//! 3. Fit with `VolModel::new(options).fit(&series)` and read the
//!    [`FittedModel`]: coefficients by role, LL/AIC/BIC, in-sample
//!    variances, diagnostics.
//! 4. Forecast with `fitted.forecast(h)`; annualize with
//!    `ForecastPath::annualized`.
//! 5. Use [`compare_models`] to fit both families and pick the lower AIC.
//!
//! Conventions
//! -----------
//! - Returns are in percent; variances and forecasts share that scale.
//! - The stack performs no I/O and no logging. Non-fatal conditions are
//!   returned as [`VolWarning`]s inside diagnostics; optimizer progress can
//!   be streamed with the `obs_slog` feature.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CoefficientTable, Diagnostics, ForecastPath, ForecastSeed, GammaResolution, Init, MeanModel,
    ModelFamily, ModelSpec, ReturnMethod, ReturnSeries, Role, SeriesSummary, SimOpts,
    VarianceGuards, VolOptions, VolParams, resolve_labelled, simulate_prices, simulate_returns,
};
pub use self::errors::{ParamError, ParamResult, VolError, VolResult, VolWarning};
pub use self::models::{
    ConstantVarianceFit, FittedModel, ModelComparison, ModelReport, VolModel, compare_models,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_volatility::volatility::prelude::*;
//
// to import the everyday volatility surface in a single line.

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{VolError, VolResult, VolWarning};
    pub use super::models::prelude::*;
}
