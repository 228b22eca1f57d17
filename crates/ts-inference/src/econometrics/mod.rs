//! Difference-in-differences toolkit.
//!
//! This module provides:
//! - **Treatment indicators** `treated`, `biden_era`, `treated_biden` derived
//!   from the panel's categorical labels.
//! - **OLS with HC3** heteroskedasticity-consistent covariance (MacKinnon–White).
//! - **DiD regression** `y = α + β₁·treated + β₂·biden_era + δ·treated_biden + ε`
//!   with listwise deletion and explicit identification checks.
//! - **Economic effects**: `(exp(β) − 1)·100` for log outcomes, with 5% significance flags.

pub mod did;
pub mod effects;
pub mod ols;
pub mod treatment;

pub use did::{Coefficient, DidSpecification, FittedModel, run_did_regression, run_did_regression_with};
pub use effects::{EconomicEffects, calculate_economic_effects, calculate_economic_effects_at};
pub use ols::{OlsFit, design_rank, ols_hc3};
pub use treatment::{construct_treatment_variables, treatment_indicators};
