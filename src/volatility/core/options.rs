//! Estimation and simulation options for volatility models.
//!
//! Purpose
//! -------
//! Gather everything that configures a fit in one value, [`VolOptions`], and
//! the controls for synthetic paths in [`SimOpts`].
//!
//! Key behaviors
//! -------------
//! - [`VolOptions::new`] validates the forecast horizon and the relaxation
//!   factor. Every other component arrives already validated by its own
//!   constructor (`ModelSpec::new`, `MLEOptions::new`, `VarianceGuards::new`).
//! - [`VolOptions::from_config`] builds options from the flat string/number
//!   configuration used by callers outside Rust.
//! - The default is GARCH(1,1), zero mean, horizon 20, strict
//!   `MLEOptions::default()` (1000 iterations), relaxed retry enabled with
//!   factor 100, default guards, and the industry starting values.
//!
//! Conventions
//! -----------
//! - `mle_opts` are the *strict* phase options; the retry derives its
//!   options from them.
use crate::{
    optimization::loglik_optimizer::{MLEOptions, Tolerances},
    volatility::{
        core::{
            guards::VarianceGuards,
            init::Init,
            spec::{MeanModel, ModelFamily, ModelSpec},
        },
        errors::{VolError, VolResult},
    },
};

/// Default forecast horizon in periods.
pub const DEFAULT_HORIZON: usize = 20;

/// Default multiplier applied to both tolerances in the relaxed retry.
pub const DEFAULT_RELAX_FACTOR: f64 = 100.0;

/// VolOptions — estimation-time configuration for GARCH/EGARCH fits.
///
/// Fields
/// ------
/// - `spec`: family and orders.
/// - `mean`: zero or estimated constant mean.
/// - `horizon`: default forecast horizon (≥ 1).
/// - `mle_opts`: strict-phase solver options.
/// - `tolerance_relax`: when `true` the retry multiplies both tolerances by
///   `relax_factor`; when `false` it reuses the strict tolerances and only
///   changes the starting point.
/// - `relax_factor`: finite and > 1.
/// - `guards`: variance floor/ceiling.
/// - `init`: starting-value policy for the strict phase; the retry uses
///   [`Init::alternative`].
#[derive(Debug, Clone, PartialEq)]
pub struct VolOptions {
    pub spec: ModelSpec,
    pub mean: MeanModel,
    pub horizon: usize,
    pub mle_opts: MLEOptions,
    pub tolerance_relax: bool,
    pub relax_factor: f64,
    pub guards: VarianceGuards,
    pub init: Init,
}

impl VolOptions {
    /// Construct options from validated components.
    ///
    /// Errors
    /// ------
    /// - `VolError::InvalidHorizon` if `horizon == 0`.
    /// - `VolError::OptimizationFailed` wrapping a tolerance error if
    ///   `relax_factor` is not finite or not above one.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spec: ModelSpec, mean: MeanModel, horizon: usize, mle_opts: MLEOptions,
        tolerance_relax: bool, relax_factor: f64, guards: VarianceGuards, init: Init,
    ) -> VolResult<Self> {
        if horizon == 0 {
            return Err(VolError::InvalidHorizon { horizon });
        }
        if !relax_factor.is_finite() || relax_factor <= 1.0 {
            return Err(VolError::OptimizationFailed {
                status: format!("relax factor must be finite and > 1, got {relax_factor}"),
            });
        }
        Ok(VolOptions {
            spec,
            mean,
            horizon,
            mle_opts,
            tolerance_relax,
            relax_factor,
            guards,
            init,
        })
    }

    /// Build options from the flat configuration keys
    /// `{model_family, p, q, forecast_horizon, mean_model, max_iterations,
    /// tolerance_relax}`. Unlisted settings take their defaults.
    ///
    /// Errors
    /// ------
    /// - `VolError::UnknownOption` for an unrecognized family or mean model.
    /// - `VolError::InvalidOrder` / `InvalidHorizon` for zero orders or
    ///   horizon.
    /// - `VolError::OptimizationFailed` for `max_iterations == 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_config(
        model_family: &str, p: usize, q: usize, forecast_horizon: usize, mean_model: &str,
        max_iterations: usize, tolerance_relax: bool,
    ) -> VolResult<Self> {
        let family: ModelFamily = model_family.parse()?;
        let mean: MeanModel = mean_model.parse()?;
        let spec = ModelSpec::new(family, p, q)?;
        let defaults = MLEOptions::default();
        let tols =
            Tolerances::new(defaults.tols.tol_grad, defaults.tols.tol_cost, Some(max_iterations))?;
        let mle_opts = MLEOptions { tols, ..defaults };
        VolOptions::new(
            spec,
            mean,
            forecast_horizon,
            mle_opts,
            tolerance_relax,
            DEFAULT_RELAX_FACTOR,
            VarianceGuards::default(),
            Init::default(),
        )
    }

    /// Default options for the `(1, 1)` model of `family`.
    pub fn for_family(family: ModelFamily) -> Self {
        VolOptions { spec: ModelSpec::one_one(family), ..VolOptions::default() }
    }

    /// Factor passed to the two-phase strategy for the retry.
    pub fn retry_relax_factor(&self) -> Option<f64> {
        self.tolerance_relax.then_some(self.relax_factor)
    }
}

impl Default for VolOptions {
    fn default() -> Self {
        VolOptions {
            spec: ModelSpec::default(),
            mean: MeanModel::default(),
            horizon: DEFAULT_HORIZON,
            mle_opts: MLEOptions::default(),
            tolerance_relax: true,
            relax_factor: DEFAULT_RELAX_FACTOR,
            guards: VarianceGuards::default(),
            init: Init::default(),
        }
    }
}

/// SimOpts — controls for synthetic return paths.
///
/// - `seed`: RNG seed; identical seeds give identical paths.
/// - `burn_in`: leading draws discarded so the path starts near the
///   stationary distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOpts {
    pub seed: u64,
    pub burn_in: usize,
}

impl SimOpts {
    pub const DEFAULT_BURN_IN: usize = 500;

    pub fn new(seed: u64, burn_in: usize) -> Self {
        SimOpts { seed, burn_in }
    }
}

impl Default for SimOpts {
    fn default() -> Self {
        SimOpts { seed: 42, burn_in: Self::DEFAULT_BURN_IN }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Defaults and the flat configuration constructor.
    // - Horizon and relax-factor validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults match the documented profile.
    //
    // Given
    // -----
    // - VolOptions::default().
    //
    // Expect
    // ------
    // - GARCH(1,1), zero mean, horizon 20, 1000 iterations, relax factor
    //   Some(100).
    fn defaults_match_profile() {
        let o = VolOptions::default();
        assert_eq!(o.spec, ModelSpec::one_one(ModelFamily::Garch));
        assert_eq!(o.mean, MeanModel::Zero);
        assert_eq!(o.horizon, 20);
        assert_eq!(o.mle_opts.tols.max_iter, Some(1000));
        assert_eq!(o.retry_relax_factor(), Some(100.0));
    }

    #[test]
    // Purpose
    // -------
    // The flat configuration parses names and applies the iteration cap.
    //
    // Given
    // -----
    // - ("egarch", 1, 1, 10, "constant", 250, false) and a zero horizon.
    //
    // Expect
    // ------
    // - EGARCH, Constant, horizon 10, max_iter 250, no relaxation.
    // - InvalidHorizon for horizon 0.
    fn from_config_parses_flat_settings() {
        let o = VolOptions::from_config("egarch", 1, 1, 10, "constant", 250, false).unwrap();
        assert_eq!(o.spec.family, ModelFamily::Egarch);
        assert_eq!(o.mean, MeanModel::Constant);
        assert_eq!(o.horizon, 10);
        assert_eq!(o.mle_opts.tols.max_iter, Some(250));
        assert_eq!(o.retry_relax_factor(), None);
        assert_eq!(
            VolOptions::from_config("garch", 1, 1, 0, "zero", 100, true).unwrap_err(),
            VolError::InvalidHorizon { horizon: 0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Relax factors at or below one are rejected.
    //
    // Given
    // -----
    // - Default components with relax_factor = 1.0.
    //
    // Expect
    // ------
    // - An error.
    fn relax_factor_must_exceed_one() {
        let d = VolOptions::default();
        let res =
            VolOptions::new(d.spec, d.mean, 5, d.mle_opts, true, 1.0, d.guards, d.init);
        assert!(res.is_err());
    }
}
