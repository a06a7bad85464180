//! Integration tests for the GARCH/EGARCH volatility pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: prices → return series → two-phase
//!   MLE fit → coefficients, information criteria and forecasts.
//! - Exercise realistic regimes on simulated data (high-persistence GARCH,
//!   EGARCH with leverage) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `volatility::core`:
//!   - `ReturnSeries` length boundary and degenerate input.
//!   - Forecast propagation (long-horizon limit, one-step round trip, EGARCH
//!     deviation reporting).
//! - `volatility::models`:
//!   - `VolModel::fit` parameter recovery, constraints, and repeatability.
//!   - `compare_models` against the constant-variance benchmark.
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (guards, θ maps, validation) are covered by
//!   unit tests.
//! - Python bindings.
use approx::assert_relative_eq;
use ndarray::array;
use rust_volatility::volatility::{
    core::{
        data::{ReturnMethod, ReturnSeries},
        forecasts::{ForecastSeed, forecast},
        guards::VarianceGuards,
        options::{SimOpts, VolOptions},
        params::{EgarchParams, GarchParams, VolParams},
        roles::Role,
        simulate::{simulate_prices, simulate_returns},
        spec::{ModelFamily, ModelSpec},
    },
    errors::{VolError, VolWarning},
    models::{
        baseline::ConstantVarianceFit,
        comparator::{ModelReport, compare_models},
        fitted::FittedModel,
        volatility_model::VolModel,
    },
};

/// GARCH(1,1) with ω = 0.01, α = 0.08, β = 0.90.
fn garch_truth() -> VolParams {
    VolParams::Garch(
        GarchParams::new(None, 0.01, array![0.08], array![0.90], 1, 1)
            .expect("true GARCH parameters are admissible"),
    )
}

/// EGARCH(1,1) with a pronounced leverage effect (γ < 0).
fn egarch_truth() -> VolParams {
    VolParams::Egarch(
        EgarchParams::new(None, 0.0, array![0.12], array![-0.12], array![0.96], 1, 1)
            .expect("true EGARCH parameters are admissible"),
    )
}

fn simulated_series(params: &VolParams, n: usize, seed: u64) -> ReturnSeries {
    let returns = simulate_returns(params, n, SimOpts::new(seed, 1000))
        .expect("simulation length is positive");
    ReturnSeries::from_returns(returns).expect("simulated returns are valid")
}

fn fit(series: &ReturnSeries, family: ModelFamily) -> FittedModel {
    VolModel::new(VolOptions::for_family(family))
        .fit(series)
        .expect("fit on simulated data should converge")
}

#[test]
// Purpose
// -------
// The preprocessor accepts exactly 50 returns and rejects 49.
//
// Given
// -----
// - Simulated price paths of 51 and 50 prices.
//
// Expect
// ------
// - 50 returns accepted with a FewObservations advisory.
// - 49 returns rejected with InsufficientData { len: 49, min: 50 }.
fn preprocessor_length_boundary() {
    // Arrange
    let p50 = simulate_prices(&garch_truth(), 50, 100.0, SimOpts::default()).unwrap();
    let p49 = simulate_prices(&garch_truth(), 49, 100.0, SimOpts::default()).unwrap();

    // Act
    let ok = ReturnSeries::from_dense_prices(p50.as_slice().unwrap(), ReturnMethod::Log);
    let err = ReturnSeries::from_dense_prices(p49.as_slice().unwrap(), ReturnMethod::Log);

    // Assert
    let ok = ok.unwrap();
    assert_eq!(ok.len(), 50);
    assert!(ok.warnings.iter().any(|w| matches!(w, VolWarning::FewObservations { .. })));
    assert_eq!(err.unwrap_err(), VolError::InsufficientData { len: 49, min: 50 });
}

#[test]
// Purpose
// -------
// Constant prices are rejected as degenerate rather than fitted.
//
// Given
// -----
// - 200 identical prices.
//
// Expect
// ------
// - InvalidData.
fn constant_prices_are_invalid() {
    let prices = vec![42.0; 200];

    let res = ReturnSeries::from_dense_prices(&prices, ReturnMethod::Log);

    assert!(matches!(res, Err(VolError::InvalidData { .. })));
}

#[test]
// Purpose
// -------
// GARCH(1,1) recovers the generating coefficients and beats the
// constant-variance benchmark.
//
// Given
// -----
// - 2000 returns simulated from ω = 0.01, α = 0.08, β = 0.90.
//
// Expect
// ------
// - α̂ and β̂ within ±0.05 of the truth; ω > 0, α, β ≥ 0, α + β < 1.
// - AIC(GARCH) < AIC(constant variance).
fn garch_recovers_parameters() {
    // Arrange
    let series = simulated_series(&garch_truth(), 2000, 20240101);

    // Act
    let fitted = fit(&series, ModelFamily::Garch);
    let null = ConstantVarianceFit::fit(&series, fitted.mean);

    // Assert
    let alpha = fitted.coefficients.value(Role::Alpha(1)).unwrap();
    let beta = fitted.coefficients.value(Role::Beta(1)).unwrap();
    let omega = fitted.coefficients.value(Role::Omega).unwrap();
    assert!((alpha - 0.08).abs() < 0.05, "alpha = {alpha}");
    assert!((beta - 0.90).abs() < 0.05, "beta = {beta}");
    assert!(omega > 0.0 && alpha >= 0.0 && beta >= 0.0 && alpha + beta < 1.0);
    assert!(fitted.aic < null.aic);
    assert_eq!(fitted.conditional_variance.len(), series.len());
}

#[test]
// Purpose
// -------
// Long-horizon GARCH forecasts converge to the unconditional volatility.
//
// Given
// -----
// - A GARCH(1,1) fit on simulated data, horizon 500.
//
// Expect
// ------
// - The last forecast is within 1% of √(ω / (1 − α − β)).
fn garch_forecast_converges_to_long_run_level() {
    let series = simulated_series(&garch_truth(), 1500, 7);
    let fitted = fit(&series, ModelFamily::Garch);

    let path = fitted.forecast(500).unwrap();

    let target = fitted.params.long_run_variance().sqrt();
    assert!(!path.degraded);
    assert_relative_eq!(path.volatility[499], target, max_relative = 0.01);
}

#[test]
// Purpose
// -------
// The one-step forecast equals the next step of the fitted recursion.
//
// Given
// -----
// - A GARCH(1,1) fit; ε_N and σ²_N from the in-sample path.
//
// Expect
// ------
// - forecast(1)[0] = √(ω + α·ε²_N + β·σ²_N).
fn one_step_forecast_round_trip() {
    let series = simulated_series(&garch_truth(), 800, 99);
    let fitted = fit(&series, ModelFamily::Garch);
    let n = series.len();
    let eps = series.returns[n - 1] - fitted.params.mu();
    let h_n = fitted.conditional_variance[n - 1];

    let path = fitted.forecast(1).unwrap();

    let expected = (fitted.params.omega()
        + fitted.params.alpha()[0] * eps * eps
        + fitted.params.beta()[0] * h_n)
        .sqrt();
    assert_relative_eq!(path.volatility[0], expected, max_relative = 1e-12);
}

#[test]
// Purpose
// -------
// Repeated fits on the same series give the same estimates.
//
// Given
// -----
// - Two GARCH(1,1) fits on one simulated series.
//
// Expect
// ------
// - Coefficients and log-likelihood agree to 1e-6 relative.
fn repeated_fits_are_idempotent() {
    let series = simulated_series(&garch_truth(), 1000, 3);

    let a = fit(&series, ModelFamily::Garch);
    let b = fit(&series, ModelFamily::Garch);

    for (x, y) in a.params.to_natural().iter().zip(b.params.to_natural().iter()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-6);
    }
    assert_relative_eq!(a.log_likelihood, b.log_likelihood, max_relative = 1e-6);
}

#[test]
// Purpose
// -------
// EGARCH fits stay stationary and detect leverage; the comparator prefers
// EGARCH on leveraged data.
//
// Given
// -----
// - 3000 returns simulated from EGARCH(1,1) with γ = −0.12.
//
// Expect
// ------
// - Σ|β̂| < 1 and |γ̂| > 2·SE(γ̂).
// - compare_models recommends EGARCH with a positive AIC gap.
fn egarch_detects_leverage_and_wins_comparison() {
    // Arrange
    let series = simulated_series(&egarch_truth(), 3000, 11);

    // Act
    let fitted = fit(&series, ModelFamily::Egarch);
    let cmp = compare_models(&series, &VolOptions::default());

    // Assert
    assert!(fitted.params.persistence() < 1.0);
    let gamma = fitted.coefficients.value(Role::Gamma(1)).unwrap();
    let se = fitted.coefficients.std_error(Role::Gamma(1)).unwrap();
    assert!(gamma.abs() > 2.0 * se, "gamma = {gamma}, se = {se}");
    assert_eq!(cmp.recommended, Some(ModelFamily::Egarch));
    assert!(cmp.aic_gap.unwrap() > 0.0);
    assert!(cmp.egarch.aic().unwrap() < cmp.baseline.aic);
}

#[test]
// Purpose
// -------
// A comparison with invalid orders reports both families as failed
// without panicking.
//
// Given
// -----
// - Options whose spec carries p = 0 (bypassing `ModelSpec::new`).
//
// Expect
// ------
// - Both reports Failed with InvalidOrder; the benchmark is still present.
fn comparator_reports_failures_per_family() {
    let series = simulated_series(&garch_truth(), 300, 5);
    let mut opts = VolOptions::default();
    opts.spec = ModelSpec { family: ModelFamily::Garch, p: 0, q: 1 };

    let cmp = compare_models(&series, &opts);

    for report in [&cmp.garch, &cmp.egarch] {
        assert!(matches!(
            report,
            ModelReport::Failed { error: VolError::InvalidOrder { p: 0, q: 1 }, .. }
        ));
    }
    assert_eq!(cmp.recommended, None);
    assert!(cmp.baseline.log_likelihood.is_finite());
}

#[test]
// Purpose
// -------
// The EGARCH forecast reports when the simplified path deviates from the
// closed form by more than 10%, and stays quiet otherwise.
//
// Given
// -----
// - EGARCH(1,1) with β = 0.9 and α = 0.5 (large convexity term) or
//   α = 0.05 (small), seeded at σ² = 1 with a zero residual, horizon 50.
//
// Expect
// ------
// - α = 0.5: a ForecastDeviation warning.
// - α = 0.05: no warning; neither path is degraded.
fn egarch_deviation_flag() {
    let seed = ForecastSeed::new(array![0.0], array![1.0]).unwrap();
    let guards = VarianceGuards::default();
    let strong = VolParams::Egarch(
        EgarchParams::new(None, 0.0, array![0.5], array![0.0], array![0.9], 1, 1).unwrap(),
    );
    let mild = VolParams::Egarch(
        EgarchParams::new(None, 0.0, array![0.05], array![0.0], array![0.9], 1, 1).unwrap(),
    );

    let strong_path = forecast(&strong, &seed, 50, &guards).unwrap();
    let mild_path = forecast(&mild, &seed, 50, &guards).unwrap();

    assert!(
        strong_path
            .warnings
            .iter()
            .any(|w| matches!(w, VolWarning::ForecastDeviation { .. }))
    );
    assert!(mild_path.warnings.is_empty());
    assert!(!strong_path.degraded && !mild_path.degraded);
}
