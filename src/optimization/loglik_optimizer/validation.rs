//! Finiteness and shape checks shared by the optimizer.
//!
//! Every helper reports the first offending element through a specific
//! [`OptError`] variant so callers can tell a bad tolerance from a bad
//! gradient or a bad estimate.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

fn first_non_finite<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(usize, f64)> {
    values.into_iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

/// A gradient tolerance, when present, must be finite and > 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// A cost-change tolerance, when present, must be finite and > 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Gradient must have length `dim` and finite entries.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad.iter()) {
        Some((index, value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter, requiring it to exist and be finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    match first_non_finite(theta.iter()) {
        Some((index, value)) => Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        }),
        None => Ok(theta),
    }
}

/// Log-likelihood values must be finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}

/// Hessian must be `dim × dim` with finite entries.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    match hessian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::InvalidHessian { row, col, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance validation branches.
    // - Location reporting for non-finite gradients, estimates, and Hessians.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances accept None and positive finite values only.
    //
    // Given
    // -----
    // - None, 1e-6, 0.0, +∞.
    //
    // Expect
    // ------
    // - Ok, Ok, Err, Err for both gradient and cost tolerances.
    fn tolerance_checks_accept_only_positive_finite() {
        for check in [verify_tol_grad, verify_tol_cost] {
            assert!(check(None).is_ok());
            assert!(check(Some(1e-6)).is_ok());
            assert!(check(Some(0.0)).is_err());
            assert!(check(Some(f64::INFINITY)).is_err());
        }
    }

    #[test]
    // Purpose
    // -------
    // Non-finite entries are reported with their position.
    //
    // Given
    // -----
    // - A gradient with NaN at index 1, θ̂ with ∞ at index 0, a Hessian with
    //   NaN at (1, 0).
    //
    // Expect
    // ------
    // - InvalidGradient{index: 1}, InvalidThetaHat{index: 0},
    //   InvalidHessian{row: 1, col: 0}.
    fn non_finite_entries_are_located() {
        assert!(matches!(
            validate_grad(&array![0.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::INFINITY, 0.0])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
        let mut h = Array2::<f64>::zeros((2, 2));
        h[[1, 0]] = f64::NAN;
        assert!(matches!(
            validate_hessian(&h, 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
    }

    #[test]
    // Purpose
    // -------
    // Dimension mismatches are caught before entry checks.
    //
    // Given
    // -----
    // - A length-2 gradient checked against dim 3.
    //
    // Expect
    // ------
    // - GradientDimMismatch { expected: 3, found: 2 }.
    fn gradient_dimension_is_checked() {
        assert_eq!(
            validate_grad(&array![1.0, 2.0], 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
    }
}
