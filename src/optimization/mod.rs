//! optimization — likelihood maximization, parameter maps, and the shared
//! optimizer error surface.
//!
//! Purpose
//! -------
//! Everything the volatility models need to go from "a log-likelihood of θ"
//! to "a fitted θ̂" lives here: the argmin-backed L-BFGS driver and its
//! strict/relaxed retry strategy (`loglik_optimizer`), the transforms that
//! keep GARCH and EGARCH parameters admissible for any finite θ
//! (`numerical_stability`), and `errors::OptError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers see an unconstrained θ. Positivity of ω, non-negativity of α
//!   and β, and the persistence bound are guaranteed by the transforms, not
//!   by solver bounds.
//! - Numerical failures (non-finite variance, line-search breakdown) are
//!   reported as `OptError`; they never panic.
//!
//! Conventions
//! -----------
//! - User-facing values are log-likelihoods. The cost `−ℓ` exists only
//!   inside the argmin adapter.
//! - No I/O. Solver progress can be streamed by enabling `obs_slog` and
//!   setting `MLEOptions::verbose`.
//!
//! Downstream usage
//! ----------------
//! - `volatility::models` implements `LogLikelihood` and calls
//!   `maximize_two_phase`.
//! - `inference` reuses the finite-difference Hessian and `EIGEN_EPS`.
//!
//! Testing notes
//! -------------
//! - Each submodule tests its own concern on small analytic objectives; the
//!   integration suite exercises the full stack on simulated return series.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
