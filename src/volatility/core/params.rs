//! Model-space parameters for GARCH(p, q) and EGARCH(p, q) and their
//! optimizer-space (θ) mapping.
//!
//! Purpose
//! -------
//! Own the constrained coefficients of a fitted or candidate model, validate
//! them at construction, and translate between three representations:
//! - θ: the unconstrained vector the optimizer moves in,
//! - the natural coefficient vector `[μ?, ω, α.., γ.., β..]` used for
//!   standard errors and the analytic score,
//! - the typed structs [`GarchParams`] / [`EgarchParams`].
//!
//! Key behaviors
//! -------------
//! - GARCH: `ω = softplus(θ_ω)`; `(α, β, slack)` is a scaled softmax of the
//!   α/β logits with an implicit zero slack logit, so any finite θ gives
//!   `α, β ≥ 0` and `Σα + Σβ < 1 − STATIONARITY_MARGIN`.
//! - EGARCH: ω, α, γ are unconstrained and mapped by identity;
//!   `β_j = ((1 − STATIONARITY_MARGIN) / q) · tanh(θ_j)`, so `Σ|β| < 1`.
//! - μ (constant mean only) is mapped by identity in both families.
//! - [`VolParams::natural_grad_to_theta`] applies the chain rule of these
//!   maps to a score expressed in natural coefficients.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed [`GarchParams`] satisfies `ω > 0`, `α, β ≥ 0`,
//!   `Σα + Σβ < 1`; a constructed [`EgarchParams`] has finite entries and
//!   `Σ|β| < 1`.
//! - Orders are implied by the vector lengths: `p = α.len()`, `q = β.len()`.
//!
//! Conventions
//! -----------
//! - θ and natural vectors share the layout of
//!   [`ParamLayout`](crate::volatility::core::spec::ParamLayout).
//! - Boundary values (e.g. α = 0) map to large negative but finite logits.
//!
//! Testing notes
//! -------------
//! - θ round trips for both families (including higher orders), the chain
//!   rule against finite differences of the map, and constructor rejections.
use crate::{
    optimization::numerical_stability::transformations::{
        STATIONARITY_MARGIN, bounded_tanh, bounded_tanh_deriv, bounded_tanh_inv, safe_logistic,
        safe_softmax, safe_softmax_deriv, safe_softmax_inv, safe_softplus, safe_softplus_inv,
    },
    volatility::{
        core::{
            spec::{MeanModel, ModelFamily, ModelSpec, ParamLayout},
            validation::{
                validate_alpha, validate_beta, validate_gamma, validate_mean, validate_omega,
                validate_persistence, validate_theta,
            },
        },
        errors::ParamResult,
    },
};
use ndarray::{Array1, ArrayView1, s};

/// GARCH(p, q) coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchParams {
    /// Constant mean; `None` under the zero-mean model.
    pub mu: Option<f64>,
    /// ω > 0
    pub omega: f64,
    /// α_i ≥ 0, length p
    pub alpha: Array1<f64>,
    /// β_j ≥ 0, length q
    pub beta: Array1<f64>,
}

impl GarchParams {
    /// Validated GARCH coefficients.
    ///
    /// Errors
    /// ------
    /// - `InvalidMean`, `InvalidOmega`, `InvalidAlpha`, `InvalidBeta` for
    ///   out-of-domain entries; length mismatches against `(p, q)`.
    /// - `StationarityViolated` when `Σα + Σβ ≥ 1`.
    pub fn new(
        mu: Option<f64>, omega: f64, alpha: Array1<f64>, beta: Array1<f64>, p: usize, q: usize,
    ) -> ParamResult<Self> {
        validate_mean(mu)?;
        validate_omega(omega, true)?;
        validate_alpha(alpha.view(), p, true)?;
        validate_beta(beta.view(), q, true)?;
        validate_persistence(alpha.sum() + beta.sum())?;
        Ok(GarchParams { mu, omega, alpha, beta })
    }

    /// `Σα + Σβ`
    pub fn persistence(&self) -> f64 {
        self.alpha.sum() + self.beta.sum()
    }

    /// Long-run variance `ω / (1 − Σα − Σβ)`.
    pub fn unconditional_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }
}

/// EGARCH(p, q) coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct EgarchParams {
    /// Constant mean; `None` under the zero-mean model.
    pub mu: Option<f64>,
    /// Log-variance intercept (any sign).
    pub omega: f64,
    /// Magnitude effects α_i, length p.
    pub alpha: Array1<f64>,
    /// Asymmetry (leverage) effects γ_i, length p.
    pub gamma: Array1<f64>,
    /// Log-variance persistence β_j, length q, with `Σ|β| < 1`.
    pub beta: Array1<f64>,
}

impl EgarchParams {
    /// Validated EGARCH coefficients.
    ///
    /// Errors
    /// ------
    /// - Non-finite entries or length mismatches against `(p, q)`.
    /// - `StationarityViolated` when `Σ|β| ≥ 1`.
    pub fn new(
        mu: Option<f64>, omega: f64, alpha: Array1<f64>, gamma: Array1<f64>, beta: Array1<f64>,
        p: usize, q: usize,
    ) -> ParamResult<Self> {
        validate_mean(mu)?;
        validate_omega(omega, false)?;
        validate_alpha(alpha.view(), p, false)?;
        validate_gamma(gamma.view(), p)?;
        validate_beta(beta.view(), q, false)?;
        validate_persistence(beta.iter().map(|b| b.abs()).sum())?;
        Ok(EgarchParams { mu, omega, alpha, gamma, beta })
    }

    /// `Σ|β|`
    pub fn persistence(&self) -> f64 {
        self.beta.iter().map(|b| b.abs()).sum()
    }

    /// Stationary mean of `ln σ²`, `ω / (1 − Σβ)`. The shock terms have
    /// zero mean under normality, so they do not shift it.
    pub fn long_run_log_variance(&self) -> f64 {
        self.omega / (1.0 - self.beta.sum())
    }
}

/// Per-lag bound on EGARCH β so that `Σ|β| < 1 − STATIONARITY_MARGIN`.
pub fn egarch_beta_bound(q: usize) -> f64 {
    (1.0 - STATIONARITY_MARGIN) / q.max(1) as f64
}

/// Coefficients of either family.
#[derive(Debug, Clone, PartialEq)]
pub enum VolParams {
    Garch(GarchParams),
    Egarch(EgarchParams),
}

impl VolParams {
    pub fn family(&self) -> ModelFamily {
        match self {
            VolParams::Garch(_) => ModelFamily::Garch,
            VolParams::Egarch(_) => ModelFamily::Egarch,
        }
    }

    /// Spec implied by the coefficient lengths.
    pub fn spec(&self) -> ModelSpec {
        ModelSpec { family: self.family(), p: self.alpha().len(), q: self.beta().len() }
    }

    pub fn mean_model(&self) -> MeanModel {
        if self.mu_opt().is_some() { MeanModel::Constant } else { MeanModel::Zero }
    }

    pub fn layout(&self) -> ParamLayout {
        self.spec().layout(self.mean_model())
    }

    /// Estimated μ, if the mean is estimated.
    pub fn mu_opt(&self) -> Option<f64> {
        match self {
            VolParams::Garch(g) => g.mu,
            VolParams::Egarch(e) => e.mu,
        }
    }

    /// μ used by the recursion (0 under the zero-mean model).
    pub fn mu(&self) -> f64 {
        self.mu_opt().unwrap_or(0.0)
    }

    pub fn omega(&self) -> f64 {
        match self {
            VolParams::Garch(g) => g.omega,
            VolParams::Egarch(e) => e.omega,
        }
    }

    pub fn alpha(&self) -> &Array1<f64> {
        match self {
            VolParams::Garch(g) => &g.alpha,
            VolParams::Egarch(e) => &e.alpha,
        }
    }

    pub fn beta(&self) -> &Array1<f64> {
        match self {
            VolParams::Garch(g) => &g.beta,
            VolParams::Egarch(e) => &e.beta,
        }
    }

    /// Asymmetry coefficients; `None` for GARCH.
    pub fn gamma(&self) -> Option<&Array1<f64>> {
        match self {
            VolParams::Garch(_) => None,
            VolParams::Egarch(e) => Some(&e.gamma),
        }
    }

    /// `Σα + Σβ` (GARCH) or `Σ|β|` (EGARCH).
    pub fn persistence(&self) -> f64 {
        match self {
            VolParams::Garch(g) => g.persistence(),
            VolParams::Egarch(e) => e.persistence(),
        }
    }

    /// Long-run variance: `ω / (1 − Σα − Σβ)` for GARCH and
    /// `exp(ω / (1 − Σβ))` (the level at the mean log-variance) for EGARCH.
    pub fn long_run_variance(&self) -> f64 {
        match self {
            VolParams::Garch(g) => g.unconditional_variance(),
            VolParams::Egarch(e) => e.long_run_log_variance().exp(),
        }
    }

    /// Map an unconstrained θ to validated coefficients.
    ///
    /// Errors
    /// ------
    /// - `ThetaLengthMismatch` / `InvalidThetaInput` for malformed θ.
    /// - Any constructor error if the mapped values leave their domain
    ///   (possible only through overflow in extreme θ).
    pub fn from_theta(
        theta: ArrayView1<f64>, spec: &ModelSpec, mean: MeanModel,
    ) -> ParamResult<Self> {
        let layout = spec.layout(mean);
        validate_theta(theta, &layout)?;
        let (p, q) = (spec.p, spec.q);
        let mu = layout.mu.map(|i| theta[i]);
        match spec.family {
            ModelFamily::Garch => {
                let omega = safe_softplus(theta[layout.omega]);
                let logits: Vec<f64> =
                    theta.slice(s![layout.alpha.start..layout.beta.end]).to_vec();
                let mut weights = vec![0.0; p + q];
                safe_softmax(&logits, &mut weights);
                let alpha = Array1::from(weights[..p].to_vec());
                let beta = Array1::from(weights[p..].to_vec());
                Ok(VolParams::Garch(GarchParams::new(mu, omega, alpha, beta, p, q)?))
            }
            ModelFamily::Egarch => {
                let bound = egarch_beta_bound(q);
                let omega = theta[layout.omega];
                let alpha = layout.alpha.clone().map(|i| theta[i]).collect();
                let gamma = layout.gamma.clone().map(|i| theta[i]).collect();
                let beta = layout.beta.clone().map(|i| bounded_tanh(theta[i], bound)).collect();
                Ok(VolParams::Egarch(EgarchParams::new(mu, omega, alpha, gamma, beta, p, q)?))
            }
        }
    }

    /// Inverse of [`VolParams::from_theta`].
    ///
    /// GARCH slack is `1 − STATIONARITY_MARGIN − Σα − Σβ`; EGARCH β beyond
    /// the per-lag bound is clamped just inside it.
    pub fn to_theta(&self) -> Array1<f64> {
        let layout = self.layout();
        let mut theta = Array1::zeros(layout.len);
        if let Some(i) = layout.mu {
            theta[i] = self.mu();
        }
        match self {
            VolParams::Garch(g) => {
                theta[layout.omega] = safe_softplus_inv(g.omega);
                let weights: Vec<f64> = g.alpha.iter().chain(g.beta.iter()).copied().collect();
                let slack = 1.0 - STATIONARITY_MARGIN - g.persistence();
                let logits = safe_softmax_inv(&weights, slack);
                for (offset, logit) in logits.into_iter().enumerate() {
                    theta[layout.alpha.start + offset] = logit;
                }
            }
            VolParams::Egarch(e) => {
                let bound = egarch_beta_bound(e.beta.len());
                theta[layout.omega] = e.omega;
                for (i, &a) in layout.alpha.clone().zip(e.alpha.iter()) {
                    theta[i] = a;
                }
                for (i, &c) in layout.gamma.clone().zip(e.gamma.iter()) {
                    theta[i] = c;
                }
                for (i, &b) in layout.beta.clone().zip(e.beta.iter()) {
                    theta[i] = bounded_tanh_inv(b, bound);
                }
            }
        }
        theta
    }

    /// Natural coefficient vector `[μ?, ω, α.., γ.., β..]`.
    pub fn to_natural(&self) -> Array1<f64> {
        let mut out = Vec::with_capacity(self.layout().len);
        out.extend(self.mu_opt());
        out.push(self.omega());
        out.extend(self.alpha().iter().copied());
        if let Some(gamma) = self.gamma() {
            out.extend(gamma.iter().copied());
        }
        out.extend(self.beta().iter().copied());
        Array1::from(out)
    }

    /// Validated coefficients from a natural vector.
    ///
    /// Errors
    /// ------
    /// - `ThetaLengthMismatch` / `InvalidThetaInput` for a malformed vector.
    /// - The family constructor's domain errors.
    pub fn from_natural(
        natural: ArrayView1<f64>, spec: &ModelSpec, mean: MeanModel,
    ) -> ParamResult<Self> {
        let layout = spec.layout(mean);
        validate_theta(natural, &layout)?;
        let mu = layout.mu.map(|i| natural[i]);
        let omega = natural[layout.omega];
        let alpha: Array1<f64> = layout.alpha.clone().map(|i| natural[i]).collect();
        let beta: Array1<f64> = layout.beta.clone().map(|i| natural[i]).collect();
        match spec.family {
            ModelFamily::Garch => {
                Ok(VolParams::Garch(GarchParams::new(mu, omega, alpha, beta, spec.p, spec.q)?))
            }
            ModelFamily::Egarch => {
                let gamma = layout.gamma.clone().map(|i| natural[i]).collect();
                Ok(VolParams::Egarch(EgarchParams::new(
                    mu, omega, alpha, gamma, beta, spec.p, spec.q,
                )?))
            }
        }
    }

    /// Coefficients from a natural vector of the right length, without
    /// domain checks. Used when differencing the score around an estimate
    /// that sits on a constraint boundary.
    pub(crate) fn from_natural_unchecked(
        natural: ArrayView1<f64>, spec: &ModelSpec, mean: MeanModel,
    ) -> Self {
        let layout = spec.layout(mean);
        let mu = layout.mu.map(|i| natural[i]);
        let omega = natural[layout.omega];
        let alpha: Array1<f64> = layout.alpha.clone().map(|i| natural[i]).collect();
        let beta: Array1<f64> = layout.beta.clone().map(|i| natural[i]).collect();
        match spec.family {
            ModelFamily::Garch => VolParams::Garch(GarchParams { mu, omega, alpha, beta }),
            ModelFamily::Egarch => {
                let gamma = layout.gamma.clone().map(|i| natural[i]).collect();
                VolParams::Egarch(EgarchParams { mu, omega, alpha, gamma, beta })
            }
        }
    }

    /// Pull `∂ℓ/∂(natural coefficients)` back to `∂ℓ/∂θ`.
    ///
    /// `theta` must be the θ these coefficients were mapped from, and
    /// `natural_grad` must follow the natural layout.
    pub fn natural_grad_to_theta(
        &self, theta: ArrayView1<f64>, natural_grad: ArrayView1<f64>,
    ) -> Array1<f64> {
        let layout = self.layout();
        let mut grad = natural_grad.to_owned();
        match self {
            VolParams::Garch(g) => {
                grad[layout.omega] *= safe_logistic(theta[layout.omega]);
                let weights: Vec<f64> = g.alpha.iter().chain(g.beta.iter()).copied().collect();
                let mut block: Vec<f64> =
                    (layout.alpha.start..layout.beta.end).map(|i| grad[i]).collect();
                safe_softmax_deriv(&weights, &mut block);
                for (offset, v) in block.into_iter().enumerate() {
                    grad[layout.alpha.start + offset] = v;
                }
            }
            VolParams::Egarch(e) => {
                let bound = egarch_beta_bound(e.beta.len());
                for i in layout.beta.clone() {
                    grad[i] *= bounded_tanh_deriv(theta[i], bound);
                }
            }
        }
        grad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::errors::ParamError;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - θ round trips for GARCH(1,1) with a mean and EGARCH(2,1).
    // - Admissibility of arbitrary θ (stationarity by construction).
    // - The θ chain rule against finite differences of a linear functional.
    // - Constructor rejections.
    // -------------------------------------------------------------------------

    fn garch11_mu() -> VolParams {
        VolParams::Garch(
            GarchParams::new(Some(0.05), 0.02, array![0.08], array![0.9], 1, 1).unwrap(),
        )
    }

    fn egarch21() -> VolParams {
        VolParams::Egarch(
            EgarchParams::new(
                None,
                -0.1,
                array![0.1, 0.05],
                array![-0.08, 0.02],
                array![0.95],
                2,
                1,
            )
            .unwrap(),
        )
    }

    #[test]
    // Purpose
    // -------
    // θ → params → θ recovers the coefficients for both families.
    //
    // Given
    // -----
    // - GARCH(1,1) with μ and EGARCH(2,1) without μ.
    //
    // Expect
    // ------
    // - from_theta(to_theta(x)) ≈ x coefficient-wise.
    fn theta_round_trip_recovers_coefficients() {
        for params in [garch11_mu(), egarch21()] {
            // Act
            let theta = params.to_theta();
            let back =
                VolParams::from_theta(theta.view(), &params.spec(), params.mean_model()).unwrap();

            // Assert
            let (a, b) = (params.to_natural(), back.to_natural());
            for (x, y) in a.iter().zip(b.iter()) {
                assert_relative_eq!(x, y, epsilon = 1e-8);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Any finite θ maps to admissible coefficients.
    //
    // Given
    // -----
    // - Extreme logits for GARCH(1,2) and EGARCH(1,2).
    //
    // Expect
    // ------
    // - GARCH persistence < 1 with non-negative α, β; EGARCH Σ|β| < 1.
    fn extreme_theta_stays_admissible() {
        let g_spec = ModelSpec::new(ModelFamily::Garch, 1, 2).unwrap();
        let e_spec = ModelSpec::new(ModelFamily::Egarch, 1, 2).unwrap();

        let g_theta = array![50.0, 40.0, 40.0, 40.0];
        let g = VolParams::from_theta(g_theta.view(), &g_spec, MeanModel::Zero).unwrap();
        let e = VolParams::from_theta(
            array![0.0, 0.3, -0.2, 30.0, 30.0].view(),
            &e_spec,
            MeanModel::Zero,
        )
        .unwrap();

        assert!(g.persistence() < 1.0);
        assert!(g.alpha().iter().chain(g.beta().iter()).all(|v| *v >= 0.0));
        assert!(e.persistence() < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The chain rule matches finite differences of a linear functional of
    // the natural coefficients.
    //
    // Given
    // -----
    // - L(θ) = w · natural(θ) with fixed weights w.
    // - GARCH(1,1) with μ and EGARCH(2,1).
    //
    // Expect
    // ------
    // - natural_grad_to_theta(w) ≈ central differences of L.
    fn chain_rule_matches_finite_differences() {
        for params in [garch11_mu(), egarch21()] {
            // Arrange
            let spec = params.spec();
            let mean = params.mean_model();
            let theta = params.to_theta();
            let w = Array1::from_shape_fn(theta.len(), |i| 0.3 + 0.7 * i as f64);
            let objective = |t: &Array1<f64>| {
                VolParams::from_theta(t.view(), &spec, mean).unwrap().to_natural().dot(&w)
            };

            // Act
            let analytic = params.natural_grad_to_theta(theta.view(), w.view());

            // Assert
            let h = 1e-6;
            for k in 0..theta.len() {
                let (mut up, mut dn) = (theta.clone(), theta.clone());
                up[k] += h;
                dn[k] -= h;
                let fd = (objective(&up) - objective(&dn)) / (2.0 * h);
                assert_relative_eq!(analytic[k], fd, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Constructors reject out-of-domain coefficients.
    //
    // Given
    // -----
    // - GARCH with α + β = 1.02, GARCH with ω = 0, EGARCH with β = 1.
    //
    // Expect
    // ------
    // - StationarityViolated, InvalidOmega, StationarityViolated.
    fn constructors_reject_invalid_coefficients() {
        assert!(matches!(
            GarchParams::new(None, 0.1, array![0.1], array![0.92], 1, 1),
            Err(ParamError::StationarityViolated { .. })
        ));
        assert!(matches!(
            GarchParams::new(None, 0.0, array![0.1], array![0.8], 1, 1),
            Err(ParamError::InvalidOmega { .. })
        ));
        assert!(matches!(
            EgarchParams::new(None, 0.0, array![0.1], array![0.0], array![1.0], 1, 1),
            Err(ParamError::StationarityViolated { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Long-run variance follows each family's formula.
    //
    // Given
    // -----
    // - GARCH ω = 0.02, α + β = 0.98; EGARCH ω = −0.1, β = 0.95.
    //
    // Expect
    // ------
    // - 1.0 and exp(−2.0).
    fn long_run_variance_by_family() {
        assert_relative_eq!(garch11_mu().long_run_variance(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(egarch21().long_run_variance(), (-2.0_f64).exp(), epsilon = 1e-12);
    }
}
