//! # ts-inference
//!
//! Inferential side of tariffstat: treatment-indicator construction, the
//! difference-in-differences OLS fit with HC3 covariance, and the
//! translation of log-linear coefficients into percentage effects.

#![warn(clippy::all)]

pub mod econometrics;

pub use econometrics::{
    Coefficient, DidSpecification, EconomicEffects, FittedModel, OlsFit,
    calculate_economic_effects, calculate_economic_effects_at, construct_treatment_variables,
    ols_hc3, run_did_regression, run_did_regression_with,
};
