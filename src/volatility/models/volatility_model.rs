//! GARCH/EGARCH model: analytic log-likelihood, gradient, and two-phase fit.
//!
//! This module wires a [`VolOptions`] configuration to the `LogLikelihood`
//! trait. θ is mapped to validated coefficients with
//! [`VolParams::from_theta`], the variance recursion runs into a reusable
//! [`VarianceWorkspace`], and the analytic score in natural coefficients is
//! pulled back to θ with [`VolParams::natural_grad_to_theta`].
//!
//! Key ideas:
//! - The objective is the *average* Gaussian log-likelihood `ℓ(θ) / n`, so
//!   tolerances do not depend on the sample size.
//! - [`VolModel::fit`] runs a strict L-BFGS attempt from the configured
//!   starting values and, only if that fails, one retry from the alternative
//!   starting values with relaxed tolerances.
//! - Standard errors come from the observed information of the natural
//!   coefficients; failure to compute them leaves NaN and a warning.
use crate::{
    inference::calc_standard_errors,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{FitStatus, Grad, LogLikelihood, Theta, maximize_two_phase},
    },
    volatility::{
        core::{
            data::ReturnSeries,
            diagnostics::Diagnostics,
            options::VolOptions,
            params::VolParams,
            recursion::{VarianceWorkspace, filter, log_likelihood, score},
            validation::validate_theta,
        },
        errors::{VolError, VolResult, VolWarning},
        models::fitted::FittedModel,
    },
};
use ndarray::Array1;
use std::cell::RefCell;

/// GARCH(p, q) or EGARCH(p, q) model with analytic log-likelihood and
/// gradient.
///
/// The workspace is single-owner scratch reused across evaluations; one
/// model instance must not be shared between threads. Independent fits
/// (e.g. in [`compare_models`](super::comparator::compare_models)) each
/// build their own model.
#[derive(Debug, Clone)]
pub struct VolModel {
    pub options: VolOptions,
    workspace: RefCell<VarianceWorkspace>,
}

impl VolModel {
    pub fn new(options: VolOptions) -> Self {
        VolModel { options, workspace: RefCell::new(VarianceWorkspace::default()) }
    }

    fn params_at(&self, theta: &Theta) -> OptResult<VolParams> {
        Ok(VolParams::from_theta(theta.view(), &self.options.spec, self.options.mean)?)
    }

    /// Fit by maximum likelihood with the two-phase strategy.
    ///
    /// ## Steps
    /// 1. Build strict and retry starting values from the data
    ///    (`options.init` and its alternative) and map them to θ.
    /// 2. Run [`maximize_two_phase`] with the strict options and the
    ///    configured relaxation.
    /// 3. Map θ̂ back to coefficients and assemble a [`FittedModel`]
    ///    (in-sample variances, information criteria, standard errors,
    ///    forecast seed, diagnostics).
    ///
    /// ## Errors
    /// - `VolError::FitFailed` when neither phase converges; carries the
    ///   best-effort coefficients when any run returned.
    /// - `VolError::OptimizationFailed` for invalid solver options.
    /// - `VolError::Param` if the data imply invalid starting values.
    pub fn fit(&self, series: &ReturnSeries) -> VolResult<FittedModel> {
        let spec = &self.options.spec;
        let mean = self.options.mean;
        let init = self.options.init;
        let strict_start = init.start_params(spec, mean, series)?.to_theta();
        let retry_start = init.alternative().start_params(spec, mean, series)?.to_theta();

        let outcome = maximize_two_phase(
            self,
            strict_start,
            retry_start,
            series,
            &self.options.mle_opts,
            self.options.retry_relax_factor(),
        )?;

        let mut diagnostics = Diagnostics::from_two_phase(&outcome, series.len());
        diagnostics.extend_warnings(series.warnings.iter().cloned());
        let best = match &outcome.best {
            Some(out) => Some(VolParams::from_theta(out.theta_hat.view(), spec, mean)?),
            None => None,
        };

        match outcome.status {
            FitStatus::Failed => {
                let status = match outcome.last_error() {
                    Some(err) => format!("{}: {err}", outcome.status),
                    None => outcome.status.to_string(),
                };
                return Err(VolError::FitFailed { status, best_effort: best.map(Box::new) });
            }
            FitStatus::ConvergedLoose => diagnostics.push_warning(VolWarning::LooseConvergence),
            FitStatus::Converged => {}
        }
        let params = best.ok_or_else(|| VolError::OptimizationFailed {
            status: "converged without a parameter estimate".to_string(),
        })?;
        let std_errors = self.standard_errors(&params, series, &mut diagnostics);
        FittedModel::from_estimate(
            params,
            series,
            &self.options,
            std_errors,
            outcome.status,
            diagnostics,
        )
    }

    /// Classical standard errors of the natural coefficients, or NaN with a
    /// warning when the information matrix cannot be formed.
    fn standard_errors(
        &self, params: &VolParams, series: &ReturnSeries, diagnostics: &mut Diagnostics,
    ) -> Array1<f64> {
        let spec = params.spec();
        let mean = params.mean_model();
        let k = params.layout().len;
        let n = series.len();
        let returns = series.returns.view();
        let s2 = series.sample_variance;
        let guards = &self.options.guards;
        let ws = RefCell::new(VarianceWorkspace::new(n));
        let score_fn = |phi: &Array1<f64>| -> Array1<f64> {
            let candidate = VolParams::from_natural_unchecked(phi.view(), &spec, mean);
            score(&candidate, returns, s2, guards, &mut ws.borrow_mut())
                .unwrap_or_else(|_| Array1::from_elem(k, f64::NAN))
        };
        match calc_standard_errors(&score_fn, &params.to_natural(), n) {
            Ok(se) => se,
            Err(err) => {
                let reason = err.to_string();
                diagnostics.push_warning(VolWarning::StandardErrorsUnavailable { reason });
                Array1::from_elem(k, f64::NAN)
            }
        }
    }
}

impl LogLikelihood for VolModel {
    type Data = ReturnSeries;

    /// Average Gaussian log-likelihood at θ.
    ///
    /// # Errors
    /// - Parameter errors when θ maps outside the admissible region.
    /// - `OptError::NonFiniteVariance` when the recursion blows up.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = self.params_at(theta)?;
        let mut ws = self.workspace.borrow_mut();
        filter(&params, data.returns.view(), data.sample_variance, &self.options.guards, &mut ws)?;
        Ok(log_likelihood(&ws) / data.len() as f64)
    }

    /// θ must match the layout of `options.spec` / `options.mean` and be
    /// finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        let layout = self.options.spec.layout(self.options.mean);
        validate_theta(theta.view(), &layout).map_err(OptError::from)
    }

    /// Analytic gradient of the average log-likelihood with respect to θ.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params = self.params_at(theta)?;
        let mut ws = self.workspace.borrow_mut();
        let natural = score(
            &params,
            data.returns.view(),
            data.sample_variance,
            &self.options.guards,
            &mut ws,
        )?;
        Ok(params.natural_grad_to_theta(theta.view(), natural.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::core::{
        init::Init,
        options::SimOpts,
        params::{EgarchParams, GarchParams},
        roles::Role,
        simulate::simulate_returns,
        spec::{MeanModel, ModelFamily},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `LogLikelihood` conformance: `check`, and `grad` against central
    //   differences of `value` in θ.
    // - A GARCH(1,1) fit on simulated data (convergence, finite SEs).
    // -------------------------------------------------------------------------

    fn garch_series(n: usize, seed: u64) -> ReturnSeries {
        let p = VolParams::Garch(
            GarchParams::new(None, 0.05, array![0.1], array![0.85], 1, 1).unwrap(),
        );
        ReturnSeries::from_returns(simulate_returns(&p, n, SimOpts::new(seed, 500)).unwrap())
            .unwrap()
    }

    fn fd_grad(model: &VolModel, theta: &Theta, data: &ReturnSeries) -> Array1<f64> {
        let h = 1e-6;
        Array1::from_shape_fn(theta.len(), |i| {
            let mut up = theta.clone();
            let mut dn = theta.clone();
            up[i] += h;
            dn[i] -= h;
            (model.value(&up, data).unwrap() - model.value(&dn, data).unwrap()) / (2.0 * h)
        })
    }

    #[test]
    // Purpose
    // -------
    // The analytic θ-gradient matches finite differences for both
    // families, including the constant mean.
    //
    // Given
    // -----
    // - 400 simulated returns; GARCH(1,1) and EGARCH(1,1) with a constant
    //   mean at interior θ.
    //
    // Expect
    // ------
    // - Each gradient entry agrees with central differences to 1e-5.
    fn grad_matches_finite_differences() {
        // Arrange
        let data = garch_series(400, 3);
        let cases = [
            VolParams::Garch(
                GarchParams::new(Some(0.02), 0.08, array![0.12], array![0.8], 1, 1).unwrap(),
            ),
            VolParams::Egarch(
                EgarchParams::new(Some(0.02), 0.02, array![0.15], array![-0.05], array![0.9], 1, 1)
                    .unwrap(),
            ),
        ];

        for params in cases {
            let opts = VolOptions {
                spec: params.spec(),
                mean: MeanModel::Constant,
                ..VolOptions::default()
            };
            let model = VolModel::new(opts);
            let theta = params.to_theta();

            // Act
            let analytic = model.grad(&theta, &data).unwrap();
            let numeric = fd_grad(&model, &theta, &data);

            // Assert
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert_relative_eq!(*a, *n, epsilon = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects θ of the wrong length.
    //
    // Given
    // -----
    // - A zero-mean EGARCH(1,1) model (θ length 4) and a length-3 θ.
    //
    // Expect
    // ------
    // - An error.
    fn check_rejects_wrong_length() {
        let model = VolModel::new(VolOptions::for_family(ModelFamily::Egarch));
        let data = garch_series(100, 1);

        assert!(model.check(&array![0.0, 0.1, 0.5], &data).is_err());
        assert!(model.check(&array![0.0, 0.1, 0.0, 0.5], &data).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A GARCH(1,1) fit converges with a finite maximum and SEs.
    //
    // Given
    // -----
    // - 1500 returns simulated from α = 0.10, β = 0.85.
    //
    // Expect
    // ------
    // - Status Converged or ConvergedLoose, persistence < 1, the fitted
    //   log-likelihood at least that of the starting values, finite SEs for
    //   α and β.
    fn garch_fit_converges() {
        // Arrange
        let data = garch_series(1500, 9);
        let model = VolModel::new(VolOptions::default());
        let start = Init::Industry
            .start_params(&model.options.spec, MeanModel::Zero, &data)
            .unwrap()
            .to_theta();

        // Act
        let fitted = model.fit(&data).unwrap();

        // Assert
        assert_ne!(fitted.status, FitStatus::Failed);
        assert!(fitted.params.persistence() < 1.0);
        let ll_start = model.value(&start, &data).unwrap() * data.len() as f64;
        assert!(fitted.log_likelihood >= ll_start - 1e-8);
        assert!(fitted.coefficients.std_error(Role::Alpha(1)).is_some());
        assert!(fitted.coefficients.std_error(Role::Beta(1)).is_some());
    }
}
