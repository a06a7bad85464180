//! Conditional-variance recursions, Gaussian log-likelihood, and the analytic
//! score for GARCH(p, q) and EGARCH(p, q).
//!
//! Purpose
//! -------
//! Map coefficients plus a return history to the in-sample conditional
//! variance path `σ²_t`, the Gaussian log-likelihood, and its gradient with
//! respect to the natural coefficients `[μ?, ω, α.., γ.., β..]`.
//!
//! Key behaviors
//! -------------
//! - GARCH: `σ²_t = ω + Σ_i α_i ε²_{t−i} + Σ_j β_j σ²_{t−j}`.
//! - EGARCH: `ln σ²_t = ω + Σ_i [α_i (|z_{t−i}| − E|z|) + γ_i z_{t−i}]
//!   + Σ_j β_j ln σ²_{t−j}` with `z = ε / σ` and `E|z| = √(2/π)`.
//! - `ε_t = R_t − μ` (μ = 0 under the zero-mean model).
//! - `LL = −½ Σ_t [ln 2π + ln σ²_t + ε²_t / σ²_t]`.
//! - The score is propagated forward alongside the recursion
//!   (`∂σ²_t/∂φ` for GARCH, `∂ln σ²_t/∂φ` and `∂z_t/∂φ` for EGARCH).
//!
//! Invariants & assumptions
//! ------------------------
//! - Pre-sample values: `σ²` and `ε²` equal the sample variance `s²` of the
//!   returns; EGARCH uses `ln σ² = ln s²` and a zero pre-sample shock term.
//!   Pre-sample values do not depend on the coefficients.
//! - Every step runs over the full sample; there is no early exit.
//! - `σ²_t` is clamped to the [`VarianceGuards`] band (log band for EGARCH)
//!   before any log, division, or square root. A clamped step has zero
//!   derivative with respect to the coefficients.
//! - A non-finite pre-clamp value is an error, never a silent clamp.
//!
//! Conventions
//! -----------
//! - [`VarianceWorkspace`] owns all per-observation buffers so repeated
//!   evaluations inside the optimizer do not allocate after the first call.
//! - Derivative buffers are row-major `n × k` with `k` the natural length.
//!
//! Testing notes
//! -------------
//! - Hand-computed first steps for both families.
//! - Score against central differences of the average log-likelihood for
//!   GARCH(2,2) and EGARCH(2,1) with an estimated mean.
//! - Guard clamping and the non-finite error path.
use crate::{
    optimization::errors::{OptError, OptResult},
    volatility::core::{
        guards::VarianceGuards,
        params::{EgarchParams, GarchParams, VolParams},
        spec::ParamLayout,
    },
};
use ndarray::{Array1, ArrayView1};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_2_SQRT_PI};

/// `E|z| = √(2/π)` for a standard normal `z`.
pub const E_ABS_Z: f64 = FRAC_2_SQRT_PI * FRAC_1_SQRT_2;

/// `ln(2π)`
pub const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Per-observation buffers for the recursions and their derivatives.
///
/// After [`filter`]:
/// - `eps[t] = R_t − μ`,
/// - `h[t] = σ²_t` (guarded), `g[t] = ln σ²_t`, `z[t] = ε_t / σ_t`,
/// - `clamped[t]` is `true` when a guard was active at step `t`.
///
/// After [`score`], `dvar` holds `∂σ²_t/∂φ` (GARCH) or `∂ln σ²_t/∂φ`
/// (EGARCH) and `dz` holds `∂z_t/∂φ` (EGARCH only).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarianceWorkspace {
    pub eps: Vec<f64>,
    pub h: Vec<f64>,
    pub g: Vec<f64>,
    pub z: Vec<f64>,
    pub clamped: Vec<bool>,
    dvar: Vec<f64>,
    dz: Vec<f64>,
}

impl VarianceWorkspace {
    pub fn new(n: usize) -> Self {
        let mut ws = VarianceWorkspace::default();
        ws.resize(n);
        ws
    }

    fn resize(&mut self, n: usize) {
        self.eps.resize(n, 0.0);
        self.h.resize(n, 0.0);
        self.g.resize(n, 0.0);
        self.z.resize(n, 0.0);
        self.clamped.resize(n, false);
    }

    fn resize_derivatives(&mut self, n: usize, k: usize) {
        self.dvar.resize(n * k, 0.0);
        self.dz.resize(n * k, 0.0);
    }

    /// Number of observations in the last filtered path.
    pub fn len(&self) -> usize {
        self.h.len()
    }

    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }
}

/// Run the variance recursion for `params` over `returns`.
///
/// Errors
/// ------
/// - `OptError::NonFiniteVariance { index, value }` if a step produces a
///   non-finite variance (or log-variance) before clamping.
pub fn filter(
    params: &VolParams, returns: ArrayView1<f64>, s2: f64, guards: &VarianceGuards,
    ws: &mut VarianceWorkspace,
) -> OptResult<()> {
    let n = returns.len();
    ws.resize(n);
    let mu = params.mu();
    for (e, &r) in ws.eps.iter_mut().zip(returns.iter()) {
        *e = r - mu;
    }
    match params {
        VolParams::Garch(p) => filter_garch(p, s2, guards, ws),
        VolParams::Egarch(p) => filter_egarch(p, s2, guards, ws),
    }
}

fn filter_garch(
    p: &GarchParams, s2: f64, guards: &VarianceGuards, ws: &mut VarianceWorkspace,
) -> OptResult<()> {
    for t in 0..ws.eps.len() {
        let mut h = p.omega;
        for (i, &a) in p.alpha.iter().enumerate() {
            let lag = i + 1;
            h += a * if t >= lag { ws.eps[t - lag] * ws.eps[t - lag] } else { s2 };
        }
        for (j, &b) in p.beta.iter().enumerate() {
            let lag = j + 1;
            h += b * if t >= lag { ws.h[t - lag] } else { s2 };
        }
        if !h.is_finite() {
            return Err(OptError::NonFiniteVariance { index: t, value: h });
        }
        let (h, clamped) = guards.clamp(h);
        ws.h[t] = h;
        ws.g[t] = h.ln();
        ws.z[t] = ws.eps[t] / h.sqrt();
        ws.clamped[t] = clamped;
    }
    Ok(())
}

fn filter_egarch(
    p: &EgarchParams, s2: f64, guards: &VarianceGuards, ws: &mut VarianceWorkspace,
) -> OptResult<()> {
    let ln_s2 = s2.ln();
    for t in 0..ws.eps.len() {
        let mut g = p.omega;
        for (i, (&a, &c)) in p.alpha.iter().zip(p.gamma.iter()).enumerate() {
            let lag = i + 1;
            if t >= lag {
                let z = ws.z[t - lag];
                g += a * (z.abs() - E_ABS_Z) + c * z;
            }
        }
        for (j, &b) in p.beta.iter().enumerate() {
            let lag = j + 1;
            g += b * if t >= lag { ws.g[t - lag] } else { ln_s2 };
        }
        if !g.is_finite() {
            return Err(OptError::NonFiniteVariance { index: t, value: g });
        }
        let (g, clamped) = guards.clamp_log(g);
        ws.g[t] = g;
        ws.h[t] = g.exp();
        ws.z[t] = ws.eps[t] * (-0.5 * g).exp();
        ws.clamped[t] = clamped;
    }
    Ok(())
}

/// Sum of Gaussian log-densities over the last filtered path.
pub fn log_likelihood(ws: &VarianceWorkspace) -> f64 {
    -0.5 * ws
        .h
        .iter()
        .zip(ws.eps.iter())
        .map(|(&h, &e)| LN_2PI + h.ln() + e * e / h)
        .sum::<f64>()
}

/// Filter and return the in-sample variance path as an owned array.
///
/// Errors
/// ------
/// - See [`filter`].
pub fn conditional_variance(
    params: &VolParams, returns: ArrayView1<f64>, s2: f64, guards: &VarianceGuards,
) -> OptResult<Array1<f64>> {
    let mut ws = VarianceWorkspace::new(returns.len());
    filter(params, returns, s2, guards, &mut ws)?;
    Ok(Array1::from(ws.h))
}

/// Gradient of the *average* log-likelihood `LL / n` with respect to the
/// natural coefficients, in layout order. Runs [`filter`] first.
///
/// Errors
/// ------
/// - See [`filter`].
pub fn score(
    params: &VolParams, returns: ArrayView1<f64>, s2: f64, guards: &VarianceGuards,
    ws: &mut VarianceWorkspace,
) -> OptResult<Array1<f64>> {
    filter(params, returns, s2, guards, ws)?;
    let layout = params.layout();
    let n = returns.len();
    ws.resize_derivatives(n, layout.len);
    let mut grad = match params {
        VolParams::Garch(p) => score_garch(p, &layout, s2, ws),
        VolParams::Egarch(p) => score_egarch(p, &layout, s2, ws),
    };
    grad.mapv_inplace(|v| v / n.max(1) as f64);
    Ok(grad)
}

fn score_garch(
    p: &GarchParams, layout: &ParamLayout, s2: f64, ws: &mut VarianceWorkspace,
) -> Array1<f64> {
    let k = layout.len;
    let mut grad = Array1::zeros(k);
    for t in 0..ws.h.len() {
        let (past, rest) = ws.dvar.split_at_mut(t * k);
        let cur = &mut rest[..k];
        cur.fill(0.0);

        // ---- direct terms ----
        cur[layout.omega] = 1.0;
        for i in 0..p.alpha.len() {
            let lag = i + 1;
            cur[layout.alpha.start + i] =
                if t >= lag { ws.eps[t - lag] * ws.eps[t - lag] } else { s2 };
        }
        for j in 0..p.beta.len() {
            let lag = j + 1;
            cur[layout.beta.start + j] = if t >= lag { ws.h[t - lag] } else { s2 };
        }
        if let Some(m) = layout.mu {
            cur[m] = p
                .alpha
                .iter()
                .enumerate()
                .filter(|(i, _)| t > *i)
                .map(|(i, &a)| -2.0 * a * ws.eps[t - i - 1])
                .sum();
        }

        // ---- recursive terms ----
        for (j, &b) in p.beta.iter().enumerate() {
            let lag = j + 1;
            if t >= lag {
                let prev = &past[(t - lag) * k..(t - lag + 1) * k];
                for (c, &d) in cur.iter_mut().zip(prev) {
                    *c += b * d;
                }
            }
        }
        if ws.clamped[t] {
            cur.fill(0.0);
        }

        let (h, e) = (ws.h[t], ws.eps[t]);
        let dl_dh = -0.5 * (1.0 / h - e * e / (h * h));
        for (gk, &d) in grad.iter_mut().zip(cur.iter()) {
            *gk += dl_dh * d;
        }
        if let Some(m) = layout.mu {
            grad[m] += e / h;
        }
    }
    grad
}

fn score_egarch(
    p: &EgarchParams, layout: &ParamLayout, s2: f64, ws: &mut VarianceWorkspace,
) -> Array1<f64> {
    let k = layout.len;
    let ln_s2 = s2.ln();
    let mut grad = Array1::zeros(k);
    for t in 0..ws.h.len() {
        let (past_g, rest_g) = ws.dvar.split_at_mut(t * k);
        let (past_z, rest_z) = ws.dz.split_at_mut(t * k);
        let cur_g = &mut rest_g[..k];
        let cur_z = &mut rest_z[..k];
        cur_g.fill(0.0);

        // ---- direct terms ----
        cur_g[layout.omega] = 1.0;
        for i in 0..p.alpha.len() {
            let lag = i + 1;
            if t >= lag {
                let z = ws.z[t - lag];
                cur_g[layout.alpha.start + i] = z.abs() - E_ABS_Z;
                cur_g[layout.gamma.start + i] = z;
            }
        }
        for j in 0..p.beta.len() {
            let lag = j + 1;
            cur_g[layout.beta.start + j] = if t >= lag { ws.g[t - lag] } else { ln_s2 };
        }

        // ---- recursive terms through lagged shocks and log-variances ----
        for (i, (&a, &c)) in p.alpha.iter().zip(p.gamma.iter()).enumerate() {
            let lag = i + 1;
            if t >= lag {
                let w = a * sign(ws.z[t - lag]) + c;
                let prev = &past_z[(t - lag) * k..(t - lag + 1) * k];
                for (cg, &dz) in cur_g.iter_mut().zip(prev) {
                    *cg += w * dz;
                }
            }
        }
        for (j, &b) in p.beta.iter().enumerate() {
            let lag = j + 1;
            if t >= lag {
                let prev = &past_g[(t - lag) * k..(t - lag + 1) * k];
                for (cg, &dg) in cur_g.iter_mut().zip(prev) {
                    *cg += b * dg;
                }
            }
        }
        if ws.clamped[t] {
            cur_g.fill(0.0);
        }

        let (h, e, z) = (ws.h[t], ws.eps[t], ws.z[t]);
        let inv_sd = (-0.5 * ws.g[t]).exp();
        for (cz, &cg) in cur_z.iter_mut().zip(cur_g.iter()) {
            *cz = -0.5 * z * cg;
        }
        if let Some(m) = layout.mu {
            cur_z[m] -= inv_sd;
        }

        let dl_dg = -0.5 * (1.0 - e * e / h);
        for (gk, &d) in grad.iter_mut().zip(cur_g.iter()) {
            *gk += dl_dg * d;
        }
        if let Some(m) = layout.mu {
            grad[m] += e / h;
        }
    }
    grad
}

/// Sign with `sign(0) = 0`.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
