//! Coefficient roles, the typed coefficient table, and a resolver for
//! externally labelled coefficient sets.
//!
//! Purpose
//! -------
//! The estimator knows exactly which coefficient is which, so fitted models
//! carry a [`CoefficientTable`] keyed by [`Role`] with no name matching
//! involved. Coefficient sets that arrive with free-form labels (another
//! tool's output, user input) go through [`resolve_labelled`], which maps
//! labels onto the same roles.
//!
//! Key behaviors
//! -------------
//! - Roles: μ (constant mean only), ω, α_i, γ_i (EGARCH only), β_j, with
//!   1-based lags.
//! - Missing values are `None` and render as `"N/A"`; they are never errors.
//! - [`GammaResolution`] keeps "not applicable" (GARCH) apart from "present
//!   but unresolved" (EGARCH); only the latter produces a
//!   [`VolWarning::ParameterUnresolved`].
//! - Label matching order: exact known names, then case-insensitive
//!   substrings, then (ω only) the first label by position.
use crate::volatility::{
    core::{params::VolParams, spec::ModelFamily},
    errors::VolWarning,
};
use ndarray::ArrayView1;
use std::fmt;

/// Semantic role of a coefficient. Lags are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Mean,
    Omega,
    Alpha(usize),
    Gamma(usize),
    Beta(usize),
}

impl Role {
    /// Canonical label: `mu`, `omega`, `alpha[i]`, `gamma[i]`, `beta[j]`.
    pub fn label(&self) -> String {
        match self {
            Role::Mean => "mu".to_string(),
            Role::Omega => "omega".to_string(),
            Role::Alpha(i) => format!("alpha[{i}]"),
            Role::Gamma(i) => format!("gamma[{i}]"),
            Role::Beta(j) => format!("beta[{j}]"),
        }
    }

    /// Roles of `params` in layout order.
    pub fn for_params(params: &VolParams) -> Vec<Role> {
        let spec = params.spec();
        let mut roles = Vec::with_capacity(params.layout().len);
        if params.mu_opt().is_some() {
            roles.push(Role::Mean);
        }
        roles.push(Role::Omega);
        roles.extend((1..=spec.p).map(Role::Alpha));
        roles.extend((1..=spec.n_gamma()).map(Role::Gamma));
        roles.extend((1..=spec.q).map(Role::Beta));
        roles
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One estimated coefficient. `std_error` is NaN when unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficient {
    pub role: Role,
    pub value: f64,
    pub std_error: f64,
}

/// Outcome of looking up the asymmetry coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GammaResolution {
    /// The family has no asymmetry term (GARCH).
    NotApplicable,
    Resolved(f64),
    /// The family has an asymmetry term but no value was found.
    Unresolved,
}

impl GammaResolution {
    pub fn value(&self) -> Option<f64> {
        match self {
            GammaResolution::Resolved(v) => Some(*v),
            _ => None,
        }
    }
}

/// Render an optional value for display; `None` and NaN become `"N/A"`.
pub fn render(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "N/A".to_string(),
    }
}

/// Coefficients of a fitted model keyed by role, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub family: ModelFamily,
    entries: Vec<Coefficient>,
}

impl CoefficientTable {
    /// Pair each coefficient with its standard error. A standard-error array
    /// of the wrong length is treated as unavailable (all NaN).
    pub fn new(params: &VolParams, std_errors: ArrayView1<f64>) -> Self {
        let values = params.to_natural();
        let roles = Role::for_params(params);
        let se_ok = std_errors.len() == values.len();
        let entries = roles
            .into_iter()
            .zip(values.iter())
            .enumerate()
            .map(|(i, (role, &value))| Coefficient {
                role,
                value,
                std_error: if se_ok { std_errors[i] } else { f64::NAN },
            })
            .collect();
        CoefficientTable { family: params.family(), entries }
    }

    pub fn get(&self, role: Role) -> Option<&Coefficient> {
        self.entries.iter().find(|c| c.role == role)
    }

    pub fn value(&self, role: Role) -> Option<f64> {
        self.get(role).map(|c| c.value)
    }

    /// Standard error, `None` when the role is absent or the SE is NaN.
    pub fn std_error(&self, role: Role) -> Option<f64> {
        self.get(role).map(|c| c.std_error).filter(|v| v.is_finite())
    }

    pub fn gamma(&self, lag: usize) -> GammaResolution {
        match (self.family, self.value(Role::Gamma(lag))) {
            (ModelFamily::Garch, _) => GammaResolution::NotApplicable,
            (ModelFamily::Egarch, Some(v)) => GammaResolution::Resolved(v),
            (ModelFamily::Egarch, None) => GammaResolution::Unresolved,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coefficient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(label, value, std_error)` strings for display.
    pub fn rows(&self) -> Vec<(String, String, String)> {
        self.entries
            .iter()
            .map(|c| (c.role.label(), render(Some(c.value)), render(Some(c.std_error))))
            .collect()
    }
}

// ---- Resolver for externally labelled coefficients ----

/// How a label was matched to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Positional,
}

/// One role-resolution event, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMatch {
    pub role: Role,
    pub label: String,
    pub kind: MatchKind,
}

/// First-lag ω/α/β/γ values resolved from labelled coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCoefficients {
    pub omega: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: GammaResolution,
    pub matches: Vec<RoleMatch>,
    pub warnings: Vec<VolWarning>,
}

const OMEGA_EXACT: &[&str] = &["omega", "Constant", "const", "Intercept"];
const ALPHA_EXACT: &[&str] = &["alpha[1]", "Alpha", "alpha"];
const BETA_EXACT: &[&str] = &["beta[1]", "Beta", "beta"];
const GAMMA_EXACT: &[&str] = &["gamma[1]", "Gamma", "gamma", "leverage", "asymmetry"];

const OMEGA_NEEDLES: &[&str] = &["omega", "const", "intercept"];
const ALPHA_NEEDLES: &[&str] = &["alpha"];
const BETA_NEEDLES: &[&str] = &["beta"];
const GAMMA_NEEDLES: &[&str] = &["gamma", "leverage", "asymmetry"];

/// Map labelled coefficients onto first-lag roles for `family`.
///
/// Each label is claimed by at most one role. Unresolved roles are `None`
/// and produce a [`VolWarning::ParameterUnresolved`]; for GARCH, γ is
/// [`GammaResolution::NotApplicable`] and never warns.
pub fn resolve_labelled<S: AsRef<str>>(
    coeffs: &[(S, f64)], family: ModelFamily,
) -> ResolvedCoefficients {
    let mut targets: Vec<(Role, &[&str], &[&str])> = vec![
        (Role::Omega, OMEGA_EXACT, OMEGA_NEEDLES),
        (Role::Alpha(1), ALPHA_EXACT, ALPHA_NEEDLES),
        (Role::Beta(1), BETA_EXACT, BETA_NEEDLES),
    ];
    if family == ModelFamily::Egarch {
        targets.push((Role::Gamma(1), GAMMA_EXACT, GAMMA_NEEDLES));
    }

    let mut claimed = vec![false; coeffs.len()];
    let mut found: Vec<Option<(usize, MatchKind)>> = vec![None; targets.len()];

    for (slot, (_, exact, _)) in found.iter_mut().zip(&targets) {
        let hit =
            exact.iter().find_map(|key| first_unclaimed(coeffs, &claimed, |label| label == *key));
        if let Some(i) = hit {
            claimed[i] = true;
            *slot = Some((i, MatchKind::Exact));
        }
    }
    for (slot, (_, _, needles)) in found.iter_mut().zip(&targets) {
        if slot.is_some() {
            continue;
        }
        let hit = first_unclaimed(coeffs, &claimed, |label| {
            let lower = label.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        });
        if let Some(i) = hit {
            claimed[i] = true;
            *slot = Some((i, MatchKind::Substring));
        }
    }
    if found[0].is_none() && !coeffs.is_empty() && !claimed[0] {
        found[0] = Some((0, MatchKind::Positional));
    }

    let mut matches = Vec::new();
    let mut warnings = Vec::new();
    let mut values = Vec::with_capacity(targets.len());
    for ((role, _, _), slot) in targets.iter().zip(&found) {
        match slot {
            Some((i, kind)) => {
                matches.push(RoleMatch {
                    role: *role,
                    label: coeffs[*i].0.as_ref().to_string(),
                    kind: *kind,
                });
                values.push(Some(coeffs[*i].1));
            }
            None => {
                warnings.push(VolWarning::ParameterUnresolved { role: role.label() });
                values.push(None);
            }
        }
    }

    let gamma = match family {
        ModelFamily::Garch => GammaResolution::NotApplicable,
        ModelFamily::Egarch => match values.get(3).copied().flatten() {
            Some(v) => GammaResolution::Resolved(v),
            None => GammaResolution::Unresolved,
        },
    };
    ResolvedCoefficients {
        omega: values[0],
        alpha: values[1],
        beta: values[2],
        gamma,
        matches,
        warnings,
    }
}

fn first_unclaimed<S: AsRef<str>>(
    coeffs: &[(S, f64)], claimed: &[bool], pred: impl Fn(&str) -> bool,
) -> Option<usize> {
    coeffs
        .iter()
        .enumerate()
        .find(|(i, (label, _))| !claimed[*i] && pred(label.as_ref()))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::core::params::{EgarchParams, GarchParams};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Typed tables built from parameters, including N/A rendering.
    // - Exact, substring, and positional label resolution.
    // - The NotApplicable / Unresolved distinction for γ.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tables follow the layout and render missing SEs as N/A.
    //
    // Given
    // -----
    // - GARCH(1,1) with μ and SEs [0.01, NaN, 0.02, 0.03].
    //
    // Expect
    // ------
    // - Roles mu, omega, alpha[1], beta[1]; omega SE is None and renders
    //   "N/A"; γ is NotApplicable.
    fn table_from_garch_params() {
        // Arrange
        let params = VolParams::Garch(
            GarchParams::new(Some(0.1), 0.05, array![0.08], array![0.9], 1, 1).unwrap(),
        );

        // Act
        let table = CoefficientTable::new(&params, array![0.01, f64::NAN, 0.02, 0.03].view());

        // Assert
        let labels: Vec<String> = table.iter().map(|c| c.role.label()).collect();
        assert_eq!(labels, ["mu", "omega", "alpha[1]", "beta[1]"]);
        assert_eq!(table.value(Role::Beta(1)), Some(0.9));
        assert_eq!(table.std_error(Role::Omega), None);
        assert_eq!(table.rows()[1].2, "N/A");
        assert_eq!(table.gamma(1), GammaResolution::NotApplicable);
        assert_eq!(render(table.value(Role::Gamma(1))), "N/A");
    }

    #[test]
    // Purpose
    // -------
    // EGARCH tables resolve γ by role.
    //
    // Given
    // -----
    // - EGARCH(1,1) with γ = −0.07 and a wrong-length SE array.
    //
    // Expect
    // ------
    // - gamma(1) = Resolved(−0.07); all SEs unavailable.
    fn table_from_egarch_params() {
        let params = VolParams::Egarch(
            EgarchParams::new(None, 0.0, array![0.1], array![-0.07], array![0.95], 1, 1).unwrap(),
        );

        let table = CoefficientTable::new(&params, array![0.1].view());

        assert_eq!(table.gamma(1), GammaResolution::Resolved(-0.07));
        assert!(table.iter().all(|c| c.std_error.is_nan()));
    }

    #[test]
    // Purpose
    // -------
    // Canonical labels resolve exactly, including γ for EGARCH.
    //
    // Given
    // -----
    // - Labels mu, omega, alpha[1], gamma[1], beta[1].
    //
    // Expect
    // ------
    // - All four roles resolved by Exact match; no warnings; μ not claimed.
    fn exact_labels_resolve() {
        let coeffs = [
            ("mu", 0.05),
            ("omega", 0.01),
            ("alpha[1]", 0.1),
            ("gamma[1]", -0.05),
            ("beta[1]", 0.95),
        ];

        let r = resolve_labelled(&coeffs, ModelFamily::Egarch);

        assert_eq!((r.omega, r.alpha, r.beta), (Some(0.01), Some(0.1), Some(0.95)));
        assert_eq!(r.gamma, GammaResolution::Resolved(-0.05));
        assert!(r.matches.iter().all(|m| m.kind == MatchKind::Exact));
        assert!(r.warnings.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Non-canonical labels fall back to substring and positional matches.
    //
    // Given
    // -----
    // - GARCH labels "w0", "ARCH_Alpha1", "GARCH_Beta_1".
    //
    // Expect
    // ------
    // - α and β by Substring, ω by Positional, γ NotApplicable.
    fn fallbacks_resolve_remaining_roles() {
        let coeffs = vec![
            ("w0".to_string(), 0.02),
            ("ARCH_Alpha1".to_string(), 0.07),
            ("GARCH_Beta_1".to_string(), 0.91),
        ];

        let r = resolve_labelled(&coeffs, ModelFamily::Garch);

        assert_eq!(r.omega, Some(0.02));
        assert_eq!(r.alpha, Some(0.07));
        assert_eq!(r.beta, Some(0.91));
        assert_eq!(r.gamma, GammaResolution::NotApplicable);
        let kinds: Vec<MatchKind> = r.matches.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MatchKind::Positional, MatchKind::Substring, MatchKind::Substring]);
    }

    #[test]
    // Purpose
    // -------
    // A missing γ in an EGARCH set is Unresolved and warned; unmatched
    // roles are None rather than errors.
    //
    // Given
    // -----
    // - EGARCH labels "omega" and "b1" only.
    //
    // Expect
    // ------
    // - alpha = None, beta = None, gamma = Unresolved, three warnings.
    fn missing_roles_are_unresolved_not_errors() {
        let coeffs = [("omega", 0.0), ("b1", 0.9)];

        let r = resolve_labelled(&coeffs, ModelFamily::Egarch);

        assert_eq!(r.omega, Some(0.0));
        assert_eq!((r.alpha, r.beta), (None, None));
        assert_eq!(r.gamma, GammaResolution::Unresolved);
        assert_eq!(r.warnings.len(), 3);
        assert!(r.warnings.contains(&VolWarning::ParameterUnresolved { role: "gamma[1]".into() }));
    }

    #[test]
    // Purpose
    // -------
    // The asymmetry term resolves under its descriptive names as well as
    // under "gamma".
    //
    // Given
    // -----
    // - EGARCH sets labelling γ as "leverage", "asymmetry", and
    //   "Leverage_Effect".
    //
    // Expect
    // ------
    // - γ Resolved(-0.1) in every case: Exact for the bare names, Substring
    //   for the decorated one; no warnings.
    fn leverage_and_asymmetry_labels_resolve_gamma() {
        for (label, kind) in [
            ("leverage", MatchKind::Exact),
            ("asymmetry", MatchKind::Exact),
            ("Leverage_Effect", MatchKind::Substring),
        ] {
            let coeffs = [("Constant", 0.1), ("alpha[1]", 0.2), (label, -0.1), ("beta[1]", 0.9)];

            let r = resolve_labelled(&coeffs, ModelFamily::Egarch);

            assert_eq!(r.gamma, GammaResolution::Resolved(-0.1), "label {label}");
            assert!(r.warnings.is_empty(), "label {label}");
            let gamma_match = r.matches.iter().find(|m| m.role == Role::Gamma(1)).unwrap();
            assert_eq!((gamma_match.label.as_str(), gamma_match.kind), (label, kind));
        }
    }
}
