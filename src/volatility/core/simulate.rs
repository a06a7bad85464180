//! Seeded simulation of GARCH/EGARCH return paths.
//!
//! Paths are driven by standard normal innovations from a `StdRng` seeded
//! with [`SimOpts::seed`], so equal seeds give identical paths. The recursion
//! starts at the long-run level (unconditional variance for GARCH, long-run
//! log-variance for EGARCH) and the first [`SimOpts::burn_in`] draws are
//! discarded. Variances pass through the default [`VarianceGuards`], which
//! keeps explosive EGARCH draws finite.
//!
//! Returns are on the same scale as the coefficients (percent when the
//! coefficients came from a fit on a [`ReturnSeries`](super::data::ReturnSeries)).
use crate::volatility::{
    core::{
        data::RETURN_SCALE, guards::VarianceGuards, options::SimOpts, params::VolParams,
        recursion::E_ABS_Z,
    },
    errors::{VolError, VolResult},
};
use ndarray::Array1;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};

/// Simulate `n` returns from `params`.
///
/// Errors
/// ------
/// - `VolError::InvalidSimulationLength` if `n == 0`.
pub fn simulate_returns(params: &VolParams, n: usize, opts: SimOpts) -> VolResult<Array1<f64>> {
    if n == 0 {
        return Err(VolError::InvalidSimulationLength { len: n });
    }
    let guards = VarianceGuards::default();
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let total = opts.burn_in + n;
    let mu = params.mu();
    let alpha = params.alpha();
    let beta = params.beta();
    let mut out = Vec::with_capacity(n);

    match params {
        VolParams::Garch(g) => {
            let h0 = g.unconditional_variance();
            let mut h_hist = vec![h0; beta.len()];
            let mut e2_hist = vec![h0; alpha.len()];
            for t in 0..total {
                let mut h = g.omega;
                h += alpha.iter().zip(e2_hist.iter().rev()).map(|(a, e2)| a * e2).sum::<f64>();
                h += beta.iter().zip(h_hist.iter().rev()).map(|(b, hh)| b * hh).sum::<f64>();
                let h = guards.clamp(h).0;
                let z: f64 = StandardNormal.sample(&mut rng);
                let eps = h.sqrt() * z;
                push_lag(&mut h_hist, h);
                push_lag(&mut e2_hist, eps * eps);
                if t >= opts.burn_in {
                    out.push(mu + eps);
                }
            }
        }
        VolParams::Egarch(e) => {
            let g0 = e.long_run_log_variance();
            let mut g_hist = vec![g0; beta.len()];
            let mut z_hist = vec![0.0f64; alpha.len()];
            for t in 0..total {
                let mut g = e.omega;
                for (i, z_prev) in z_hist.iter().rev().enumerate() {
                    g += alpha[i] * (z_prev.abs() - E_ABS_Z) + e.gamma[i] * z_prev;
                }
                g += beta.iter().zip(g_hist.iter().rev()).map(|(b, gg)| b * gg).sum::<f64>();
                let g = guards.clamp_log(g).0;
                let z: f64 = StandardNormal.sample(&mut rng);
                push_lag(&mut g_hist, g);
                push_lag(&mut z_hist, z);
                if t >= opts.burn_in {
                    out.push(mu + (0.5 * g).exp() * z);
                }
            }
        }
    }
    Ok(Array1::from(out))
}

/// Simulate `n + 1` prices starting at `start_price`, compounding the
/// simulated returns as percentage log returns.
///
/// Errors
/// ------
/// - `VolError::InvalidSimulationLength` if `n == 0`.
/// - `VolError::InvalidData` if `start_price` is not finite and positive.
pub fn simulate_prices(
    params: &VolParams, n: usize, start_price: f64, opts: SimOpts,
) -> VolResult<Array1<f64>> {
    if !start_price.is_finite() || start_price <= 0.0 {
        return Err(VolError::InvalidData {
            index: None,
            value: start_price,
            reason: "start price must be finite and positive",
        });
    }
    let returns = simulate_returns(params, n, opts)?;
    let mut prices = Vec::with_capacity(n + 1);
    let mut p = start_price;
    prices.push(p);
    for r in returns.iter() {
        p *= (r / RETURN_SCALE).exp();
        prices.push(p);
    }
    Ok(Array1::from(prices))
}

/// Append `value` to a fixed-length history, oldest first.
fn push_lag(hist: &mut [f64], value: f64) {
    if hist.is_empty() {
        return;
    }
    hist.rotate_left(1);
    if let Some(last) = hist.last_mut() {
        *last = value;
    }
}
