//! models — fitting, fitted results, and model comparison for GARCH/EGARCH.
//!
//! Purpose
//! -------
//! Collect the user-facing estimation API. This layer sits on top of
//! `volatility::core`, wiring the variance recursion and its analytic score
//! to the generic log-likelihood optimizer and its two-phase strategy.
//!
//! Key behaviors
//! -------------
//! - [`VolModel`] implements `LogLikelihood` (average Gaussian
//!   log-likelihood in θ-space with an analytic gradient) and provides
//!   `fit`, returning a self-contained [`FittedModel`].
//! - [`FittedModel`] carries coefficients with standard errors, the
//!   in-sample variance path, LL/AIC/BIC, status, diagnostics, and the
//!   forecast seed; `forecast(h)` needs nothing else.
//! - [`ConstantVarianceFit`] is the closed-form no-dynamics benchmark.
//! - [`compare_models`] fits both families in parallel and recommends the
//!   lower AIC, isolating failures per family.
//!
//! Invariants & assumptions
//! ------------------------
//! - Model scratch buffers are single-owner; a [`VolModel`] is not shared
//!   across threads. Parallel fits build one model each.
//! - Fitted coefficients satisfy the family constraints by construction of
//!   the θ map.
//!
//! Conventions
//! -----------
//! - Information criteria are on the sample scale: `AIC = 2k − 2LL`,
//!   `BIC = k·ln n − 2LL`.
//! - A fit that neither phase can converge is an error
//!   (`VolError::FitFailed`), never a `FittedModel` with a failed status.

pub mod baseline;
pub mod comparator;
pub mod fitted;
pub mod volatility_model;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::baseline::ConstantVarianceFit;
pub use self::comparator::{ModelComparison, ModelReport, compare_models};
pub use self::fitted::{FittedModel, information_criteria};
pub use self::volatility_model::VolModel;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_volatility::volatility::models::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::baseline::ConstantVarianceFit;
    pub use super::comparator::{ModelComparison, ModelReport, compare_models};
    pub use super::fitted::FittedModel;
    pub use super::volatility_model::VolModel;
}
