//! inference — post-estimation uncertainty for fitted volatility models.
//!
//! Purpose
//! -------
//! Compute classical standard errors of the fitted coefficients from the
//! observed information matrix at the MLE. The estimation layer supplies an
//! analytic score on the natural coefficient scale (ω, α, β, γ, μ), so the
//! resulting SEs are directly comparable to the reported coefficients.
//!
//! Conventions
//! -----------
//! - Failure to compute a Hessian is not a fitting failure: callers fill
//!   NaN and keep the point estimates.
//! - Weakly identified coefficients (singular information directions) are
//!   reported as NaN individually.

pub mod hessian;

pub use self::hessian::calc_standard_errors;

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}
