//! loglik_optimizer — argmin-backed maximizer for volatility log-likelihoods.
//!
//! Purpose
//! -------
//! Turn a model's average log-likelihood `ℓ(θ)` into a numerical estimate
//! `θ̂`. Model code implements [`LogLikelihood`]; this module handles solver
//! selection, stopping rules, gradient fallbacks, outcome normalization, and
//! the strict-then-relaxed retry strategy used by the volatility fitters.
//!
//! Key behaviors
//! -------------
//! - [`maximize`] checks the start point, wraps the model in
//!   [`adapter::ArgMinAdapter`] (which minimizes `c(θ) = −ℓ(θ)`), builds an
//!   L-BFGS solver with the requested line search, and runs it.
//! - [`two_phase::maximize_two_phase`] runs a strict attempt and, when it
//!   does not converge, a single retry from an alternative start with
//!   optionally relaxed tolerances. The result is tagged with a
//!   [`FitStatus`].
//! - [`finite_diff`] supplies central/forward difference gradients and
//!   Hessians whenever a model has no analytic derivative.
//! - [`validation`] rejects non-finite tolerances, gradients, estimates,
//!   and Hessians before they leave the module.
//!
//! Invariants & assumptions
//! ------------------------
//! - Users implement `ℓ(θ)` and, optionally, `∇ℓ(θ)`; the cost sign flip is
//!   internal.
//! - θ lives in an unconstrained space. Constraint handling belongs to the
//!   model's parameter mapping, not to the solver.
//! - Failures are reported as [`OptError`](crate::optimization::errors::OptError)
//!   values. Nothing here panics on bad numerical input.
//!
//! Conventions
//! -----------
//! - [`OptimOutcome::value`] is a log-likelihood, never a cost.
//! - Hitting the iteration cap is reported as `converged = false`.
//!
//! Downstream usage
//! ----------------
//! - `volatility::models` implements [`LogLikelihood`] for GARCH and EGARCH
//!   and drives estimation through [`two_phase::maximize_two_phase`].
//! - `inference::hessian` reuses [`finite_diff::compute_hessian`] for
//!   standard errors.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign handling in the adapter, builder wiring,
//!   finite-difference accuracy on smooth functions, option validation, and
//!   the retry logic on toy concave objectives.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod two_phase;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::two_phase::{FitPhase, FitStatus, PhaseAttempt, TwoPhaseOutcome, maximize_two_phase};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::two_phase::{FitStatus, maximize_two_phase};
    pub use super::types::{Cost, Grad, Theta};
}
