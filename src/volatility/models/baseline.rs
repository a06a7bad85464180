//! Constant-variance null model.
//!
//! Fits `R_t = μ + ε_t`, `ε_t ~ N(0, σ²)` in closed form so GARCH/EGARCH
//! fits have a no-dynamics benchmark on the same likelihood scale. The MLE
//! variance is the mean squared residual; the maximized log-likelihood is
//! `−½·n·(ln(2π·σ̂²) + 1)`.
use crate::volatility::{
    core::{
        data::ReturnSeries, recursion::LN_2PI, spec::MeanModel,
    },
    models::fitted::information_criteria,
};

/// Closed-form constant-variance fit.
///
/// `k` is 1 under the zero mean and 2 under a constant mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVarianceFit {
    pub mean: Option<f64>,
    pub variance: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_params: usize,
}

impl ConstantVarianceFit {
    pub fn fit(series: &ReturnSeries, mean_model: MeanModel) -> Self {
        let n = series.len();
        let mean = mean_model.is_estimated().then_some(series.sample_mean);
        let mu = mean.unwrap_or(0.0);
        let variance = series.returns.iter().map(|r| (r - mu) * (r - mu)).sum::<f64>() / n as f64;
        let log_likelihood = -0.5 * n as f64 * (LN_2PI + variance.ln() + 1.0);
        let n_params = 1 + usize::from(mean.is_some());
        let (aic, bic) = information_criteria(log_likelihood, n_params, n);
        ConstantVarianceFit { mean, variance, log_likelihood, aic, bic, n_params }
    }

    pub fn volatility(&self) -> f64 {
        self.variance.sqrt()
    }
}
