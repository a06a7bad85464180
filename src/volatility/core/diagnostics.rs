//! Structured fit diagnostics.
//!
//! Every fit, forecast and resolution step reports what happened through a
//! [`Diagnostics`] value: one [`FitAttemptRecord`] per solver run, the
//! warnings collected along the way, and any label-to-role matches made by
//! the resolver. Nothing is printed; callers decide what to surface.
use crate::{
    optimization::loglik_optimizer::{FitPhase, TwoPhaseOutcome},
    volatility::{core::roles::RoleMatch, errors::VolWarning},
};
use std::mem::discriminant;

/// One solver run. `log_likelihood` is on the sample scale (average × n).
#[derive(Debug, Clone, PartialEq)]
pub struct FitAttemptRecord {
    pub phase: FitPhase,
    pub converged: bool,
    pub status: String,
    pub iterations: Option<usize>,
    pub log_likelihood: Option<f64>,
    pub error: Option<String>,
}

/// Diagnostics attached to fits, comparisons, and forecasts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagnostics {
    pub attempts: Vec<FitAttemptRecord>,
    pub warnings: Vec<VolWarning>,
    pub role_matches: Vec<RoleMatch>,
}

impl Diagnostics {
    /// Records for each attempt of a two-phase run over `n_obs` observations.
    pub fn from_two_phase(outcome: &TwoPhaseOutcome, n_obs: usize) -> Self {
        let attempts = outcome
            .attempts
            .iter()
            .map(|a| match &a.result {
                Ok(out) => FitAttemptRecord {
                    phase: a.phase,
                    converged: out.converged,
                    status: out.status.clone(),
                    iterations: Some(out.iterations),
                    log_likelihood: Some(out.value * n_obs as f64),
                    error: None,
                },
                Err(e) => FitAttemptRecord {
                    phase: a.phase,
                    converged: false,
                    status: "error".to_string(),
                    iterations: None,
                    log_likelihood: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        Diagnostics { attempts, ..Diagnostics::default() }
    }

    pub fn push_warning(&mut self, warning: VolWarning) {
        self.warnings.push(warning);
    }

    pub fn extend_warnings<I: IntoIterator<Item = VolWarning>>(&mut self, warnings: I) {
        self.warnings.extend(warnings);
    }

    /// `true` if a warning of the same variant as `like` was recorded.
    pub fn has_warning_like(&self, like: &VolWarning) -> bool {
        self.warnings.iter().any(|w| discriminant(w) == discriminant(like))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{FitStatus, OptimOutcome, PhaseAttempt},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversion of two-phase attempts into records (success and error).
    // - Warning lookup by variant.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Attempts are recorded in order with sample-scale log-likelihoods.
    //
    // Given
    // -----
    // - A strict attempt that errored and a relaxed attempt with average
    //   log-likelihood −1.5 over 200 observations.
    //
    // Expect
    // ------
    // - Two records; the first carries the error text, the second
    //   log_likelihood = −300.
    fn records_follow_attempts() {
        // Arrange
        let ok = OptimOutcome {
            theta_hat: array![0.1],
            value: -1.5,
            converged: true,
            status: "Terminated(SolverConverged)".into(),
            iterations: 12,
            fn_evals: Default::default(),
            grad_norm: Some(1e-7),
        };
        let outcome = TwoPhaseOutcome {
            status: FitStatus::ConvergedLoose,
            best: Some(ok.clone()),
            attempts: vec![
                PhaseAttempt {
                    phase: FitPhase::Strict,
                    result: Err(OptError::NonFiniteVariance { index: 3, value: f64::INFINITY }),
                },
                PhaseAttempt { phase: FitPhase::Relaxed, result: Ok(ok) },
            ],
        };

        // Act
        let diag = Diagnostics::from_two_phase(&outcome, 200);

        // Assert
        assert_eq!(diag.attempts.len(), 2);
        assert!(diag.attempts[0].error.is_some());
        assert!(!diag.attempts[0].converged);
        assert_eq!(diag.attempts[1].phase, FitPhase::Relaxed);
        assert_eq!(diag.attempts[1].iterations, Some(12));
        assert_relative_eq!(diag.attempts[1].log_likelihood.unwrap(), -300.0);
    }

    #[test]
    // Purpose
    // -------
    // Warnings are matched by variant regardless of payload.
    //
    // Given
    // -----
    // - A recorded LooseConvergence warning.
    //
    // Expect
    // ------
    // - LooseConvergence found; ForecastDegraded not found.
    fn warning_lookup_by_variant() {
        let mut diag = Diagnostics::default();
        diag.push_warning(VolWarning::LooseConvergence);

        assert!(diag.has_warning_like(&VolWarning::LooseConvergence));
        assert!(!diag.has_warning_like(&VolWarning::ForecastDegraded { reason: String::new() }));
    }
}
