//! inference::hessian — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn the score of an average log-likelihood into per-coefficient
//! standard errors at the MLE. The observed information `J = −∇²ℓ̄(φ̂)` is
//! obtained by differencing the score, copied into `nalgebra`, and inverted
//! through a symmetric eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - Eigenvalues `λ_k > EIGEN_EPS` contribute `Q[i,k]² / λ_k` to the
//!   variance of coefficient `i`.
//! - A coefficient that loads on a numerically singular direction
//!   (`Σ_{λ_k ≤ EIGEN_EPS} Q[i,k]² > SINGULAR_LOADING_TOL`) gets a NaN
//!   standard error instead of a misleading finite one.
//! - Variances are rescaled from the average scale to the sample scale by
//!   dividing by the number of observations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `score_fn` returns the gradient of the *average* log-likelihood with
//!   respect to the natural model coefficients, in the same order as
//!   `point`.
//! - Callers treat an `Err` as "standard errors unavailable" and fill NaN;
//!   estimation itself never fails because of inference.
//!
//! Conventions
//! -----------
//! - No explicit matrix inverse is formed.
//! - Results are standard errors (square roots), never variances.
//!
//! Testing notes
//! -------------
//! - Unit tests check a diagonal quadratic with known SEs, the NaN rule on a
//!   rank-deficient information matrix, and the `1/n` rescaling.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Squared loading on null directions above which an SE is reported as NaN.
const SINGULAR_LOADING_TOL: f64 = 1e-6;

/// Standard errors of `point` from the observed information of an average
/// log-likelihood evaluated over `n_obs` observations.
///
/// # Errors
/// Propagates Hessian validation errors from [`compute_hessian`].
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    score_fn: &F, point: &Array1<f64>, n_obs: usize,
) -> OptResult<Array1<f64>> {
    let hess = compute_hessian(score_fn, point)?;
    let obs_info = hess.mapv(|v| -v);
    let mut obs_info_nalg = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    let mut se = solve_for_se(obs_info_nalg);
    let scale = (n_obs.max(1) as f64).sqrt();
    se.mapv_inplace(|v| v / scale);
    Ok(se)
}

// ---- Helper methods ----

fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &v) in src.indexed_iter() {
        dst[(i, j)] = v;
    }
}

/// `sqrt(diag(J⁺))` with NaN for coefficients tied to singular directions.
fn solve_for_se(obs_info: DMatrix<f64>) -> Array1<f64> {
    let n = obs_info.nrows();
    let eigen = obs_info.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambdas = eigen.eigenvalues;

    Array1::from_shape_fn(n, |i| {
        let mut var = 0.0;
        let mut null_loading = 0.0;
        for (k, &lambda) in lambdas.iter().enumerate() {
            let q2 = q[(i, k)] * q[(i, k)];
            if lambda > EIGEN_EPS {
                var += q2 / lambda;
            } else {
                null_loading += q2;
            }
        }
        if null_loading > SINGULAR_LOADING_TOL { f64::NAN } else { var.sqrt() }
    })
}
