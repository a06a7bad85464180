//! Numerically stable reparameterizations for constrained volatility parameters.
//!
//! The optimizer works in an unconstrained space `θ ∈ ℝᵏ`. The helpers here map
//! θ-coordinates into the constrained regions required by the variance
//! recursions and push log-likelihood gradients back through those maps:
//!
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞) for the GARCH
//!   intercept `ω`, with [`safe_logistic`] as its derivative.
//! - [`safe_softmax`] / [`safe_softmax_inv`] / [`safe_softmax_deriv`]: ℝᵐ ↔ the
//!   scaled simplex `{w ≥ 0, Σw + slack = 1 − STATIONARITY_MARGIN}` used for the
//!   GARCH `(α, β)` block. The slack coordinate carries an implicit zero logit.
//! - [`bounded_tanh`] / [`bounded_tanh_inv`] / [`bounded_tanh_deriv`]: ℝ ↔
//!   `(−b, b)` for EGARCH persistence coefficients.
//!
//! Cutoffs (`x > 20.0`) keep `f64` arithmetic away from overflow in the same way
//! common ML libraries guard softplus.

/// Distance kept between the persistence sum and one.
///
/// GARCH weights satisfy `Σα + Σβ ≤ 1 − STATIONARITY_MARGIN` and EGARCH
/// persistence satisfies `Σ|β| ≤ 1 − STATIONARITY_MARGIN`, so the recursions
/// never evaluate exactly on the unit-root boundary.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Smallest weight used when inverting softmax / tanh maps.
///
/// Boundary values such as `α = 0` have no finite logit; they are nudged to
/// this value before taking logarithms.
pub const LOGIT_EPS: f64 = 1e-10;

/// Eigenvalue cutoff below which an information direction is treated as
/// numerically singular.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20.0`, `softplus(x) ≈ x` to machine precision.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: returns `t = ln(exp(x) − 1)`.
///
/// # Parameters
/// - `x`: a finite, strictly positive softplus output.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic `σ(x) = 1 / (1 + exp(−x))`.
///
/// This is the derivative of [`safe_softplus`]. The branch on the sign of `x`
/// keeps `exp` from overflowing in either tail.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Map logits to scaled simplex weights with an implicit slack coordinate.
///
/// Parameters
/// ----------
/// - `logits`: unconstrained coordinates `x_1..x_m`.
/// - `weights`: output buffer of the same length, overwritten with
///   `w_k = (1 − STATIONARITY_MARGIN) · exp(x_k) / (1 + Σ_l exp(x_l))`.
///
/// Returns
/// -------
/// The slack `(1 − STATIONARITY_MARGIN) / (1 + Σ_l exp(x_l))`, so that
/// `Σw + slack = 1 − STATIONARITY_MARGIN`.
///
/// Notes
/// -----
/// Uses the max-shift trick (including the implicit zero logit) so large
/// logits never overflow.
///
/// Panics
/// ------
/// Panics if `logits` and `weights` differ in length.
pub fn safe_softmax(logits: &[f64], weights: &mut [f64]) -> f64 {
    assert_eq!(logits.len(), weights.len(), "softmax buffers must have equal length");
    let scale = 1.0 - STATIONARITY_MARGIN;
    let shift = logits.iter().copied().fold(0.0_f64, f64::max);
    let slack_raw = (-shift).exp();
    let mut denom = slack_raw;
    for (w, &x) in weights.iter_mut().zip(logits) {
        *w = (x - shift).exp();
        denom += *w;
    }
    for w in weights.iter_mut() {
        *w *= scale / denom;
    }
    scale * slack_raw / denom
}

/// Inverse of [`safe_softmax`]: recover logits from weights and slack.
///
/// Weights and slack below [`LOGIT_EPS`] are floored so that boundary values
/// (e.g. `α = 0`) map to large negative but finite logits.
pub fn safe_softmax_inv(weights: &[f64], slack: f64) -> Vec<f64> {
    let log_slack = slack.max(LOGIT_EPS).ln();
    weights.iter().map(|&w| w.max(LOGIT_EPS).ln() - log_slack).collect()
}

/// Pull a gradient with respect to softmax weights back to the logits, in place.
///
/// On entry `grad[k] = ∂ℓ/∂w_k`; on exit `grad[k] = ∂ℓ/∂x_k`, using
/// `∂ℓ/∂x_l = w_l · (g_l − Σ_k g_k w_k / (1 − STATIONARITY_MARGIN))`.
/// The slack coordinate does not enter the likelihood, so its gradient is zero.
///
/// Panics
/// ------
/// Panics if `weights` and `grad` differ in length.
pub fn safe_softmax_deriv(weights: &[f64], grad: &mut [f64]) {
    assert_eq!(weights.len(), grad.len(), "softmax buffers must have equal length");
    let scale = 1.0 - STATIONARITY_MARGIN;
    let weighted: f64 = weights.iter().zip(grad.iter()).map(|(w, g)| w * g).sum::<f64>() / scale;
    for (g, &w) in grad.iter_mut().zip(weights) {
        *g = w * (*g - weighted);
    }
}

/// `b · tanh(x)`, mapping ℝ onto the open interval `(−b, b)`.
pub fn bounded_tanh(x: f64, bound: f64) -> f64 {
    bound * x.tanh()
}

/// Derivative of [`bounded_tanh`] with respect to `x`.
pub fn bounded_tanh_deriv(x: f64, bound: f64) -> f64 {
    let t = x.tanh();
    bound * (1.0 - t * t)
}

/// Inverse of [`bounded_tanh`]; `y` is clamped strictly inside `(−b, b)` first.
pub fn bounded_tanh_inv(y: f64, bound: f64) -> f64 {
    let u = (y / bound).clamp(-1.0 + LOGIT_EPS, 1.0 - LOGIT_EPS);
    u.atanh()
}
