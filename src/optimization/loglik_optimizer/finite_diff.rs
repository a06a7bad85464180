//! Finite-difference Hessians for curvature-based inference.
//!
//! The volatility models supply analytic score vectors; the observed
//! information matrix is obtained by differencing those scores. Central
//! differences are tried first and forward differences are the fallback
//! when the central stencil produces non-finite entries (for example when a
//! step crosses a variance guard). The result is symmetrized before it is
//! returned, because differencing a gradient gives a matrix whose upper and
//! lower triangles agree only up to truncation error.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, types::Hessian, validation::validate_hessian},
};
use finitediff::FiniteDiff;

/// Hessian of the scalar function whose gradient is `grad_fn`, at `point`.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`](crate::optimization::errors::OptError::HessianDimMismatch)
///   or [`OptError::InvalidHessian`](crate::optimization::errors::OptError::InvalidHessian)
///   when the forward-difference fallback is also unusable.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(grad_fn: &F, point: &Theta) -> OptResult<Hessian> {
    let dim = point.len();
    let mut hess = point.central_hessian(grad_fn);
    if validate_hessian(&hess, dim).is_err() {
        hess = point.forward_hessian(grad_fn);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
