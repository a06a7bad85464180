//! GARCH vs. EGARCH comparison on one return series.
//!
//! Both families are fitted with the same orders, mean model and solver
//! settings, each on its own model instance and its own copy of the series,
//! in parallel via `rayon::join`. A failure in one family is reported as
//! [`ModelReport::Failed`] and never prevents the other from being reported.
//! The lower-AIC family is recommended; the constant-variance null fit is
//! included as a no-dynamics benchmark.
use crate::volatility::{
    core::{
        data::ReturnSeries,
        options::VolOptions,
        spec::{ModelFamily, ModelSpec},
    },
    errors::VolError,
    models::{baseline::ConstantVarianceFit, fitted::FittedModel, volatility_model::VolModel},
};

/// Outcome of one family's fit inside a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReport {
    Fitted(Box<FittedModel>),
    Failed { family: ModelFamily, error: VolError },
}

impl ModelReport {
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelReport::Fitted(m) => m.spec.family,
            ModelReport::Failed { family, .. } => *family,
        }
    }

    pub fn fitted(&self) -> Option<&FittedModel> {
        match self {
            ModelReport::Fitted(m) => Some(m),
            ModelReport::Failed { .. } => None,
        }
    }

    pub fn aic(&self) -> Option<f64> {
        self.fitted().map(|m| m.aic)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModelReport::Failed { .. })
    }
}

/// Side-by-side result of [`compare_models`].
///
/// - `recommended`: family with the lower AIC among successful fits
///   (`None` when both failed).
/// - `aic_gap`: `|AIC_GARCH − AIC_EGARCH|` when both fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    pub garch: ModelReport,
    pub egarch: ModelReport,
    pub baseline: ConstantVarianceFit,
    pub recommended: Option<ModelFamily>,
    pub aic_gap: Option<f64>,
}

impl ModelComparison {
    pub fn report(&self, family: ModelFamily) -> &ModelReport {
        match family {
            ModelFamily::Garch => &self.garch,
            ModelFamily::Egarch => &self.egarch,
        }
    }

    /// The recommended fitted model, if any.
    pub fn best(&self) -> Option<&FittedModel> {
        self.recommended.and_then(|f| self.report(f).fitted())
    }
}

/// Fit GARCH and EGARCH on `series` and rank them by AIC.
///
/// `options.spec` supplies the orders; its family is ignored. Invalid orders
/// surface as a `Failed` report for both families.
pub fn compare_models(series: &ReturnSeries, options: &VolOptions) -> ModelComparison {
    let (garch, egarch) = rayon::join(
        || fit_family(series.clone(), options, ModelFamily::Garch),
        || fit_family(series.clone(), options, ModelFamily::Egarch),
    );
    let baseline = ConstantVarianceFit::fit(series, options.mean);

    let (recommended, aic_gap) = match (garch.aic(), egarch.aic()) {
        (Some(g), Some(e)) => {
            let winner = if e < g { ModelFamily::Egarch } else { ModelFamily::Garch };
            (Some(winner), Some((g - e).abs()))
        }
        (Some(_), None) => (Some(ModelFamily::Garch), None),
        (None, Some(_)) => (Some(ModelFamily::Egarch), None),
        (None, None) => (None, None),
    };
    ModelComparison { garch, egarch, baseline, recommended, aic_gap }
}

fn fit_family(series: ReturnSeries, options: &VolOptions, family: ModelFamily) -> ModelReport {
    let spec = match ModelSpec::new(family, options.spec.p, options.spec.q) {
        Ok(spec) => spec,
        Err(error) => return ModelReport::Failed { family, error },
    };
    let model = VolModel::new(VolOptions { spec, ..options.clone() });
    match model.fit(&series) {
        Ok(fitted) => ModelReport::Fitted(Box::new(fitted)),
        Err(error) => ModelReport::Failed { family, error },
    }
}
