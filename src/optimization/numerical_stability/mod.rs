//! numerical_stability — constrained-parameter maps and shared tolerances.
//!
//! Purpose
//! -------
//! Keep every transform between the optimizer's unconstrained θ-space and the
//! constrained volatility parameters in one place, together with the small
//! tolerances (`STATIONARITY_MARGIN`, `LOGIT_EPS`, `EIGEN_EPS`) that the
//! estimation and inference layers share.
//!
//! Key behaviors
//! -------------
//! - Softplus / logistic pair for the strictly positive GARCH intercept.
//! - Scaled softmax with implicit slack for the GARCH `(α, β)` block, so any
//!   finite θ yields `α, β ≥ 0` and `Σα + Σβ < 1`.
//! - Bounded tanh for EGARCH persistence, so any finite θ yields `|β| < 1`.
//! - Jacobian-vector helpers that push `∂ℓ/∂(model params)` back to θ.
//!
//! Conventions
//! -----------
//! - Helpers operate on plain `f64` slices and scalars; shape checks are the
//!   caller's job and mismatches panic as programming errors.
//! - No logging, no I/O, no global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, LOGIT_EPS, STATIONARITY_MARGIN, bounded_tanh, bounded_tanh_deriv, bounded_tanh_inv,
    safe_logistic, safe_softmax, safe_softmax_deriv, safe_softmax_inv, safe_softplus,
    safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, LOGIT_EPS, STATIONARITY_MARGIN, bounded_tanh, bounded_tanh_inv, safe_logistic,
        safe_softmax, safe_softmax_inv, safe_softplus, safe_softplus_inv,
    };
}
