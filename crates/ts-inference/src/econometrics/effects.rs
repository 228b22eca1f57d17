//! Percentage-effect interpretation of log-outcome DiD coefficients.

use serde::Serialize;
use ts_core::{Error, Result};

use super::did::{FittedModel, TREATED, TREATED_BIDEN};

/// Significance level for the `*_significant` flags.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Economic effects of a fitted DiD model.
///
/// Each field is `None` (and omitted from JSON) when the model did not
/// estimate the underlying term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicEffects {
    /// `(exp(β_treated) − 1) · 100`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_effect_pct: Option<f64>,
    /// p-value of `treated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_pvalue: Option<f64>,
    /// `treatment_pvalue < alpha`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_significant: Option<bool>,
    /// `(exp(δ) − 1) · 100`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biden_interaction_pct: Option<f64>,
    /// p-value of `treated_biden`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biden_interaction_pvalue: Option<f64>,
    /// `biden_interaction_pvalue < alpha`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biden_interaction_significant: Option<bool>,
}

/// Exact log-point to percent conversion.
pub fn percent_effect(beta: f64) -> f64 {
    beta.exp_m1() * 100.0
}

/// Effects at the 5% level.
pub fn calculate_economic_effects(model: &FittedModel) -> Result<EconomicEffects> {
    calculate_economic_effects_at(model, DEFAULT_ALPHA)
}

/// Effects with significance judged at `alpha`.
pub fn calculate_economic_effects_at(model: &FittedModel, alpha: f64) -> Result<EconomicEffects> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::Validation(format!("alpha must be in (0, 1), got {alpha}")));
    }
    if !model.is_log_outcome() {
        return Err(Error::Validation(format!(
            "percentage effects need a log outcome; `{}` is in levels",
            model.outcome()
        )));
    }

    let treated = model.coefficient(TREATED);
    let interaction = model.coefficient(TREATED_BIDEN);

    Ok(EconomicEffects {
        treatment_effect_pct: treated.map(|c| percent_effect(c.estimate)),
        treatment_pvalue: treated.map(|c| c.p_value),
        treatment_significant: treated.map(|c| c.p_value < alpha),
        biden_interaction_pct: interaction.map(|c| percent_effect(c.estimate)),
        biden_interaction_pvalue: interaction.map(|c| c.p_value),
        biden_interaction_significant: interaction.map(|c| c.p_value < alpha),
    })
}
