//! Configuration types and the model-facing trait for log-likelihood fitting.
//!
//! - [`LogLikelihood`]: what a model implements to be fitted.
//! - [`Tolerances`] and [`MLEOptions`]: validated stopping rules and solver
//!   settings.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized result of one solver run.
//!
//! The optimizer maximizes `ℓ(θ)` by minimizing `c(θ) = −ℓ(θ)`. Analytic
//! gradients are gradients of `ℓ`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Log-likelihood interface implemented by fitted models.
///
/// - `type Data`: payload passed to every evaluation (for the volatility
///   models, the return series).
///
/// Required:
/// - `value`: evaluate `ℓ(θ)`. Invalid θ or numerical breakdown is an
///   `OptError`, never a panic.
/// - `check`: reject unusable `(θ, data)` pairs before the solver starts.
///
/// Optional:
/// - `grad`: analytic `∇ℓ(θ)`. The default returns
///   [`OptError::GradientNotImplemented`], which makes the adapter fall back
///   to finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Solver settings for a single optimization attempt.
///
/// - `tols`: stopping rules.
/// - `line_searcher`: line search inside L-BFGS.
/// - `verbose`: attach the slog terminal observer (needs the `obs_slog`
///   feature; ignored otherwise).
/// - `lbfgs_mem`: L-BFGS history length, `None` for
///   [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
///
/// The default is the strict profile used for the first fitting phase:
/// `tol_grad = 1e-6`, `tol_cost = 1e-10`, `max_iter = 1000`, More–Thuente.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options, rejecting a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }

    /// Copy of these options with both tolerances multiplied by `factor`.
    ///
    /// The iteration cap, line search, and memory are unchanged. Absent
    /// tolerances stay absent.
    ///
    /// # Errors
    /// Returns a tolerance error when `factor` is not finite and positive.
    pub fn relaxed(&self, factor: f64) -> OptResult<Self> {
        let tols = Tolerances::new(
            self.tols.tol_grad.map(|t| t * factor),
            self.tols.tol_cost.map(|t| t * factor),
            self.tols.max_iter,
        )?;
        Ok(Self { tols, ..self.clone() })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-10), max_iter: Some(1000) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules for one solver run.
///
/// - `tol_grad`: stop when the gradient norm drops below this.
/// - `tol_cost`: stop when the cost change drops below this.
/// - `max_iter`: hard iteration cap.
///
/// At least one must be set (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive values.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result of a single `maximize` run.
///
/// - `theta_hat`: best θ found.
/// - `value`: `ℓ(θ̂)`, not the cost.
/// - `converged`: `true` only when a tolerance was met. Running out of
///   iterations or never terminating both count as not converged.
/// - `status`: readable termination status.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: argmin's evaluation counters (`cost_count`, ...).
/// - `grad_norm`: norm of the final gradient, if available.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] when
    ///   the best parameter is absent or non-finite.
    /// - [`OptError::NonFiniteCost`] when the value is non-finite.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                (false, format!("{termination:?}"))
            }
            TerminationStatus::Terminated(_) => (true, format!("{termination:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}
