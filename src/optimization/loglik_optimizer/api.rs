//! Single-run entry point for maximizing a [`LogLikelihood`].
//!
//! The model is wrapped in an [`ArgMinAdapter`] that exposes `c(θ) = −ℓ(θ)`
//! to argmin, an L-BFGS solver is built for the configured line search, and
//! execution is delegated to [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` once with L-BFGS, starting from `theta0`.
///
/// # Parameters
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta0`: unconstrained start point.
/// - `data`: payload forwarded to `value`, `grad`, and `check`.
/// - `opts`: tolerances, line search, verbosity, and L-BFGS memory.
///
/// # Errors
/// - Whatever `f.check` rejects about the start point or data.
/// - Solver construction errors from the builders.
/// - Runtime errors raised by argmin or by the model during the run.
///
/// # Returns
/// An [`OptimOutcome`] with the best θ, `ℓ(θ̂)`, termination status, and
/// evaluation counters.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
