//! Validation helpers for volatility parameters and optimizer inputs.
//!
//! Purpose
//! -------
//! Centralize the small checks used by parameter constructors and the θ
//! mapping so every entry point fails fast with a structured [`ParamError`].
//!
//! Key behaviors
//! -------------
//! - ω: finite, and strictly positive for GARCH.
//! - α, β: correct length; finite, and non-negative for GARCH.
//! - γ and μ: finite.
//! - Stationarity: `Σα + Σβ < 1` (GARCH) or `Σ|β| < 1` (EGARCH).
//! - θ: expected length and finite entries.
//!
//! Conventions
//! -----------
//! - Coefficient indices in errors are 0-based lag positions.
//! - Nothing here panics on invalid inputs.
use crate::volatility::{
    core::spec::ParamLayout,
    errors::{ParamError, ParamResult},
};
use ndarray::ArrayView1;

/// ω must be finite; `positive` additionally requires ω > 0 (GARCH).
pub fn validate_omega(omega: f64, positive: bool) -> ParamResult<()> {
    if !omega.is_finite() || (positive && omega <= 0.0) {
        return Err(ParamError::InvalidOmega { value: omega });
    }
    Ok(())
}

pub fn validate_mean(mu: Option<f64>) -> ParamResult<()> {
    match mu {
        Some(value) if !value.is_finite() => Err(ParamError::InvalidMean { value }),
        _ => Ok(()),
    }
}

/// Length `p`; finite entries, and non-negative when `non_negative`.
pub fn validate_alpha(alpha: ArrayView1<f64>, p: usize, non_negative: bool) -> ParamResult<()> {
    if alpha.len() != p {
        return Err(ParamError::AlphaLengthMismatch { expected: p, actual: alpha.len() });
    }
    if let Some((index, value)) = first_invalid(alpha, non_negative) {
        return Err(ParamError::InvalidAlpha { index, value });
    }
    Ok(())
}

/// Length `q`; finite entries, and non-negative when `non_negative`.
pub fn validate_beta(beta: ArrayView1<f64>, q: usize, non_negative: bool) -> ParamResult<()> {
    if beta.len() != q {
        return Err(ParamError::BetaLengthMismatch { expected: q, actual: beta.len() });
    }
    if let Some((index, value)) = first_invalid(beta, non_negative) {
        return Err(ParamError::InvalidBeta { index, value });
    }
    Ok(())
}

/// Length `p` (reported as an α-length mismatch since γ shares the ARCH
/// order) and finite entries.
pub fn validate_gamma(gamma: ArrayView1<f64>, p: usize) -> ParamResult<()> {
    if gamma.len() != p {
        return Err(ParamError::AlphaLengthMismatch { expected: p, actual: gamma.len() });
    }
    if let Some((index, value)) = first_invalid(gamma, false) {
        return Err(ParamError::InvalidGamma { index, value });
    }
    Ok(())
}

/// Persistence must be strictly below one.
pub fn validate_persistence(persistence: f64) -> ParamResult<()> {
    if !persistence.is_finite() || persistence >= 1.0 {
        return Err(ParamError::StationarityViolated { coeff_sum: persistence });
    }
    Ok(())
}

/// θ must match the layout length and contain only finite values.
pub fn validate_theta(theta: ArrayView1<f64>, layout: &ParamLayout) -> ParamResult<()> {
    if theta.len() != layout.len {
        return Err(ParamError::ThetaLengthMismatch { expected: layout.len, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ParamError::InvalidThetaInput { index, value });
    }
    Ok(())
}

fn first_invalid(x: ArrayView1<f64>, non_negative: bool) -> Option<(usize, f64)> {
    x.iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || (non_negative && **v < 0.0))
        .map(|(i, v)| (i, *v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::core::spec::{MeanModel, ModelFamily, ModelSpec};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign rules that differ between GARCH and EGARCH coefficients.
    // - Length mismatches and stationarity.
    // - θ length and finiteness.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Sign constraints apply only when requested.
    //
    // Given
    // -----
    // - ω = −0.5, α = [−0.1], β = [−0.2].
    //
    // Expect
    // ------
    // - Rejected in GARCH mode, accepted in EGARCH mode.
    fn sign_rules_follow_family() {
        assert!(matches!(validate_omega(-0.5, true), Err(ParamError::InvalidOmega { .. })));
        assert!(validate_omega(-0.5, false).is_ok());
        assert!(matches!(
            validate_alpha(array![-0.1].view(), 1, true),
            Err(ParamError::InvalidAlpha { index: 0, .. })
        ));
        assert!(validate_alpha(array![-0.1].view(), 1, false).is_ok());
        assert!(validate_beta(array![-0.2].view(), 1, false).is_ok());
        assert!(validate_beta(array![-0.2].view(), 1, true).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Lengths, non-finite values, and persistence are checked.
    //
    // Given
    // -----
    // - β of length 2 for q = 1, γ = [NaN], persistence 1.0, μ = ∞.
    //
    // Expect
    // ------
    // - BetaLengthMismatch, InvalidGamma, StationarityViolated, InvalidMean.
    fn lengths_finiteness_and_persistence() {
        assert_eq!(
            validate_beta(array![0.1, 0.2].view(), 1, true).unwrap_err(),
            ParamError::BetaLengthMismatch { expected: 1, actual: 2 }
        );
        assert!(matches!(
            validate_gamma(array![f64::NAN].view(), 1),
            Err(ParamError::InvalidGamma { index: 0, .. })
        ));
        assert!(matches!(
            validate_persistence(1.0),
            Err(ParamError::StationarityViolated { .. })
        ));
        assert!(validate_persistence(0.999).is_ok());
        assert!(matches!(
            validate_mean(Some(f64::INFINITY)),
            Err(ParamError::InvalidMean { .. })
        ));
        assert!(validate_mean(None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // θ validation uses the layout length.
    //
    // Given
    // -----
    // - GARCH(1,1) zero-mean layout (k = 3); θ of length 4 and θ with NaN.
    //
    // Expect
    // ------
    // - ThetaLengthMismatch and InvalidThetaInput { index: 1 }.
    fn theta_checks_use_layout() {
        let layout = ModelSpec::one_one(ModelFamily::Garch).layout(MeanModel::Zero);
        assert_eq!(
            validate_theta(array![0.0, 0.0, 0.0, 0.0].view(), &layout).unwrap_err(),
            ParamError::ThetaLengthMismatch { expected: 3, actual: 4 }
        );
        assert!(matches!(
            validate_theta(array![0.0, f64::NAN, 0.0].view(), &layout),
            Err(ParamError::InvalidThetaInput { index: 1, .. })
        ));
        assert!(validate_theta(array![0.0, 1.0, 2.0].view(), &layout).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Coefficient errors report the first offending entry by position and
    // value.
    //
    // Given
    // -----
    // - β = [0.5, −0.2, −0.3] (GARCH mode) and γ = [0.1, NaN].
    //
    // Expect
    // ------
    // - InvalidBeta { index: 1, value: −0.2 }.
    // - InvalidGamma at index 1 carrying the NaN.
    fn first_offending_entry_is_reported() {
        let beta = validate_beta(array![0.5, -0.2, -0.3].view(), 3, true);
        let gamma = validate_gamma(array![0.1, f64::NAN].view(), 2);

        assert_eq!(beta, Err(ParamError::InvalidBeta { index: 1, value: -0.2 }));
        assert!(matches!(
            gamma,
            Err(ParamError::InvalidGamma { index: 1, value }) if value.is_nan()
        ));
    }
}
