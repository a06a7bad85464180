//! Strict-then-relaxed estimation strategy.
//!
//! Purpose
//! -------
//! Volatility likelihoods are flat near the persistence boundary and the
//! first L-BFGS attempt from a data-driven start sometimes stalls. This
//! module runs one strict attempt and, if it does not converge, exactly one
//! retry from an alternative start with (optionally) relaxed tolerances.
//!
//! Key behaviors
//! -------------
//! - Phase 1 uses the caller's strict [`MLEOptions`] from `strict_start`.
//! - Phase 2 runs only when phase 1 errors or stops without meeting a
//!   tolerance. It starts from `retry_start` and uses the strict options
//!   scaled by `relax_factor` when one is given.
//! - The outcome carries a [`FitStatus`], every attempt (for diagnostics),
//!   and the best finite outcome seen, even when neither phase converged.
//!
//! Conventions
//! -----------
//! - A solver error in a phase counts as a failed phase; it never aborts
//!   the strategy.
//! - "Best" means the highest log-likelihood among successful runs.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{LogLikelihood, MLEOptions, OptimOutcome, Theta, api::maximize},
};
use std::fmt;

/// Tag attached to a fitted model describing how estimation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// Strict attempt met its tolerance.
    Converged,
    /// Only the retry met its (possibly relaxed) tolerance.
    ConvergedLoose,
    /// Neither attempt converged.
    Failed,
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FitStatus::Converged => "converged",
            FitStatus::ConvergedLoose => "converged_loose",
            FitStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Which attempt a [`PhaseAttempt`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPhase {
    Strict,
    Relaxed,
}

impl fmt::Display for FitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitPhase::Strict => f.write_str("strict"),
            FitPhase::Relaxed => f.write_str("relaxed"),
        }
    }
}

/// One solver run and how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseAttempt {
    pub phase: FitPhase,
    pub result: OptResult<OptimOutcome>,
}

impl PhaseAttempt {
    fn converged(&self) -> bool {
        matches!(&self.result, Ok(out) if out.converged)
    }
}

/// Aggregate result of [`maximize_two_phase`].
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPhaseOutcome {
    pub status: FitStatus,
    /// Highest-likelihood successful run, if any run returned at all.
    pub best: Option<OptimOutcome>,
    /// Attempts in execution order (one or two entries).
    pub attempts: Vec<PhaseAttempt>,
}

impl TwoPhaseOutcome {
    /// Last solver error, useful when no run produced an outcome.
    pub fn last_error(&self) -> Option<&OptError> {
        self.attempts.iter().rev().find_map(|a| a.result.as_ref().err())
    }
}

/// Maximize `f` with a strict attempt and at most one retry.
///
/// # Parameters
/// - `strict_start`: start point for phase 1.
/// - `retry_start`: start point for phase 2.
/// - `strict`: solver options for phase 1.
/// - `relax_factor`: multiplier applied to both tolerances in phase 2;
///   `None` reuses the strict options.
///
/// # Errors
/// Only option errors from relaxing the tolerances are returned as `Err`.
/// Solver failures are folded into the outcome.
pub fn maximize_two_phase<F: LogLikelihood>(
    f: &F, strict_start: Theta, retry_start: Theta, data: &F::Data, strict: &MLEOptions,
    relax_factor: Option<f64>,
) -> OptResult<TwoPhaseOutcome> {
    let first = PhaseAttempt {
        phase: FitPhase::Strict,
        result: maximize(f, strict_start, data, strict),
    };
    if first.converged() {
        let best = first.result.clone().ok();
        return Ok(TwoPhaseOutcome { status: FitStatus::Converged, best, attempts: vec![first] });
    }

    let retry_opts = match relax_factor {
        Some(factor) => strict.relaxed(factor)?,
        None => strict.clone(),
    };
    let second = PhaseAttempt {
        phase: FitPhase::Relaxed,
        result: maximize(f, retry_start, data, &retry_opts),
    };

    let status = if second.converged() { FitStatus::ConvergedLoose } else { FitStatus::Failed };
    let best = match status {
        FitStatus::ConvergedLoose => second.result.clone().ok(),
        _ => [&first, &second]
            .into_iter()
            .filter_map(|a| a.result.as_ref().ok())
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .cloned(),
    };
    Ok(TwoPhaseOutcome { status, best, attempts: vec![first, second] })
}
