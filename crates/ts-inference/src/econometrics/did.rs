//! Difference-in-differences regression on a labeled panel.
//!
//! Fits `y = α + β₁·treated + β₂·biden_era + δ·treated_biden + ε` by OLS with
//! HC3 covariance, where δ is the DiD estimate.
//!
//! # References
//!
//! - Angrist & Pischke, *Mostly Harmless Econometrics*, Ch. 5.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use ts_core::{Error, Outcome, Panel, Result};

use super::ols::ols_hc3;

/// Intercept column name.
pub const CONST: &str = "const";
/// Treated-group indicator column name.
pub const TREATED: &str = "treated";
/// Policy-era indicator column name.
pub const BIDEN_ERA: &str = "biden_era";
/// Interaction column name.
pub const TREATED_BIDEN: &str = "treated_biden";

/// 97.5% standard-normal quantile.
const Z_975: f64 = 1.959_963_984_540_054;

/// Which indicator terms enter the design next to the intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DidSpecification {
    /// Include `treated`.
    pub include_treated: bool,
    /// Include `biden_era`.
    pub include_biden_era: bool,
    /// Include `treated_biden`.
    pub include_interaction: bool,
}

impl Default for DidSpecification {
    fn default() -> Self {
        Self { include_treated: true, include_biden_era: true, include_interaction: true }
    }
}

impl DidSpecification {
    /// Main effects only.
    pub fn without_interaction() -> Self {
        Self { include_interaction: false, ..Self::default() }
    }

    /// Design column names, intercept first.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![CONST];
        if self.include_treated {
            names.push(TREATED);
        }
        if self.include_biden_era {
            names.push(BIDEN_ERA);
        }
        if self.include_interaction {
            names.push(TREATED_BIDEN);
        }
        names
    }
}

/// One estimated coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    /// Design column name.
    pub name: String,
    /// Point estimate.
    pub estimate: f64,
    /// HC3 standard error.
    pub std_error: f64,
    /// `estimate / std_error`.
    pub z_stat: f64,
    /// Two-sided p-value (standard normal reference).
    pub p_value: f64,
    /// 95% CI lower bound.
    pub ci_lower: f64,
    /// 95% CI upper bound.
    pub ci_upper: f64,
    /// Classical (non-robust) standard error, for comparison.
    pub std_error_ols: f64,
}

/// Fitted DiD model for one outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    outcome: Outcome,
    log_outcome: bool,
    cov_type: &'static str,
    coefficients: Vec<Coefficient>,
    /// HC3 covariance, row-major k × k, in coefficient order.
    covariance: Vec<f64>,
    r_squared: f64,
    adj_r_squared: f64,
    n_obs: usize,
    n_dropped: usize,
    df_resid: usize,
}

impl FittedModel {
    /// Dependent variable.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True when the dependent variable is log-transformed.
    pub fn is_log_outcome(&self) -> bool {
        self.log_outcome
    }

    /// Covariance estimator label (`HC3`).
    pub fn cov_type(&self) -> &str {
        self.cov_type
    }

    /// Coefficients in design-column order.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// Coefficient names, the index of every per-coefficient quantity.
    pub fn names(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    /// Coefficient by name; `None` when the term was not estimated.
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Point estimate by name.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.coefficient(name).map(|c| c.estimate)
    }

    /// p-value by name.
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.coefficient(name).map(|c| c.p_value)
    }

    /// HC3 covariance entry for two named coefficients.
    pub fn covariance(&self, a: &str, b: &str) -> Option<f64> {
        let k = self.coefficients.len();
        let i = self.coefficients.iter().position(|c| c.name == a)?;
        let j = self.coefficients.iter().position(|c| c.name == b)?;
        Some(self.covariance[i * k + j])
    }

    /// Centered R².
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Adjusted R².
    pub fn adj_r_squared(&self) -> f64 {
        self.adj_r_squared
    }

    /// Observations used in the fit.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Rows dropped for a missing outcome.
    pub fn n_dropped(&self) -> usize {
        self.n_dropped
    }

    /// Residual degrees of freedom.
    pub fn df_resid(&self) -> usize {
        self.df_resid
    }
}

fn two_sided_p(z: f64) -> f64 {
    // 2·(1 − Φ(|z|)) = erfc(|z|/√2)
    statrs::function::erf::erfc(z.abs() / std::f64::consts::SQRT_2)
}

/// Full DiD specification (`const`, `treated`, `biden_era`, `treated_biden`).
pub fn run_did_regression(panel: &Panel, outcome: Outcome) -> Result<FittedModel> {
    run_did_regression_with(panel, outcome, &DidSpecification::default())
}

/// DiD regression with a chosen set of indicator terms.
///
/// Rows with a missing outcome are dropped (listwise deletion) and counted in
/// [`FittedModel::n_dropped`]. Fails with [`Error::Schema`] when indicators
/// have not been constructed, and with [`Error::Regression`] when fewer rows
/// than columns remain, an included indicator is constant over the surviving
/// rows, or the design is otherwise rank-deficient.
pub fn run_did_regression_with(
    panel: &Panel,
    outcome: Outcome,
    spec: &DidSpecification,
) -> Result<FittedModel> {
    let ind = panel.indicators().ok_or_else(|| {
        Error::Schema(format!(
            "column `{TREATED}` not found: treatment indicators have not been constructed"
        ))
    })?;

    let names = spec.column_names();
    let k = names.len();

    let mut y = Vec::with_capacity(panel.len());
    let mut x_data = Vec::with_capacity(panel.len() * k);
    let mut dropped = 0usize;
    for (i, obs) in panel.rows().iter().enumerate() {
        let Some(v) = outcome.value(obs) else {
            dropped += 1;
            continue;
        };
        y.push(v);
        for &name in &names {
            let col = match name {
                TREATED => ind.treated[i],
                BIDEN_ERA => ind.biden_era[i],
                TREATED_BIDEN => ind.treated_biden[i],
                _ => 1,
            };
            x_data.push(f64::from(col));
        }
    }
    let n = y.len();
    if dropped > 0 {
        log::info!(
            "{outcome}: dropped {dropped} of {} rows with a missing value (listwise deletion)",
            panel.len()
        );
    }

    if n < k {
        return Err(Error::Regression(format!(
            "{outcome}: {n} observations remain after dropping {dropped} with a missing value, \
             fewer than the {k} design columns"
        )));
    }

    // Name the culprit when an indicator carries no variation.
    for (j, &name) in names.iter().enumerate().skip(1) {
        let first = x_data[j];
        if (0..n).all(|i| x_data[i * k + j] == first) {
            return Err(Error::Regression(format!(
                "{outcome}: design column `{name}` is constant ({first}) across all {n} \
                 surviving rows; the specification is not identified"
            )));
        }
    }

    let x = DMatrix::from_row_slice(n, k, &x_data);
    let y_vec = DVector::from_vec(y);
    let fit = ols_hc3(&x, &y_vec).map_err(|e| match e {
        Error::Regression(msg) => Error::Regression(format!("{outcome}: {msg}")),
        other => other,
    })?;

    let coefficients: Vec<Coefficient> = names
        .iter()
        .enumerate()
        .map(|(j, &name)| {
            let estimate = fit.coefficients[j];
            let se = fit.se_hc3[j];
            let z_stat = estimate / se;
            Coefficient {
                name: name.to_string(),
                estimate,
                std_error: se,
                z_stat,
                p_value: two_sided_p(z_stat),
                ci_lower: estimate - Z_975 * se,
                ci_upper: estimate + Z_975 * se,
                std_error_ols: fit.se_ols[j],
            }
        })
        .collect();

    let covariance: Vec<f64> =
        (0..k).flat_map(|i| (0..k).map(move |j| (i, j))).map(|(i, j)| fit.cov_hc3[(i, j)]).collect();

    log::debug!("{outcome}: fitted on {n} rows, R² = {:.4}", fit.r_squared);

    Ok(FittedModel {
        outcome,
        log_outcome: outcome.is_log(),
        cov_type: "HC3",
        coefficients,
        covariance,
        r_squared: fit.r_squared,
        adj_r_squared: fit.adj_r_squared,
        n_obs: n,
        n_dropped: dropped,
        df_resid: fit.df_resid(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::econometrics::treatment::construct_treatment_variables;
    use approx::assert_abs_diff_eq;
    use ts_core::{EraBoundary, Observation, PolicyEra, Quarter, TreatmentGroup};

    /// Two industries × 8 quarters (4 pre, 4 post), deterministic wobble.
    fn panel(effect: f64) -> Panel {
        let mut rows = Vec::new();
        for (name, group, base) in [
            ("Iron and Steel", TreatmentGroup::Treatment, 3.0),
            ("Textile Mills", TreatmentGroup::Control, 2.5),
        ] {
            let treated = group == TreatmentGroup::Treatment;
            for (t, q) in
                ["2019Q1", "2019Q3", "2020Q1", "2020Q3", "2021Q1", "2021Q3", "2022Q1", "2022Q3"]
                    .iter()
                    .enumerate()
            {
                let quarter: Quarter = q.parse().unwrap();
                let era = EraBoundary::default().era_of(&quarter);
                let post = era == PolicyEra::BidenEra;
                let wobble = if t % 2 == 0 { 0.01 } else { -0.01 };
                let log_y = base + 0.1 * f64::from(u8::from(post))
                    + if treated && post { effect } else { 0.0 }
                    + wobble;
                rows.push(
                    Observation::new(name.replace(' ', "_"), name, group, quarter, &EraBoundary::default())
                        .with_measures(
                            Some(log_y.exp()),
                            if t == 0 { None } else { Some(1.0e6) },
                            Some(1000.0),
                        ),
                );
            }
        }
        let mut p = Panel::new(rows);
        construct_treatment_variables(&mut p).unwrap();
        p
    }

    #[test]
    fn recovers_exact_interaction() {
        let p = panel(-0.2);
        let m = run_did_regression(&p, Outcome::LogAvgMonthlyEmployment).unwrap();
        assert_eq!(m.names(), vec!["const", "treated", "biden_era", "treated_biden"]);
        assert_abs_diff_eq!(m.param(TREATED_BIDEN).unwrap(), -0.2, epsilon = 1e-10);
        assert_abs_diff_eq!(m.param(TREATED).unwrap(), 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(m.param(BIDEN_ERA).unwrap(), 0.1, epsilon = 1e-10);
        assert_eq!(m.n_obs(), 16);
        assert_eq!(m.n_dropped(), 0);
        assert_eq!(m.df_resid(), 12);
        assert_eq!(m.cov_type(), "HC3");
        assert!(m.is_log_outcome());
        let se = m.coefficient(TREATED_BIDEN).unwrap().std_error;
        assert_abs_diff_eq!(m.covariance(TREATED_BIDEN, TREATED_BIDEN).unwrap(), se * se, epsilon = 1e-14);
    }

    #[test]
    fn missing_outcome_rows_are_dropped_and_counted() {
        let p = panel(0.0);
        let m = run_did_regression(&p, Outcome::TotalQtrlyWages);
        // Wages are constant, but dropping still happens before the fit.
        let m = match m {
            Ok(m) => m,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(m.n_dropped(), 2);
        assert_eq!(m.n_obs(), 14);
    }

    #[test]
    fn indicators_required() {
        let p = panel(0.0);
        let bare = p.filtered(|_| true);
        let err = run_did_regression(&bare, Outcome::AvgMonthlyEmployment).unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn dropping_control_group_is_not_identified() {
        let p = panel(-0.2);
        let mut treated_only = p.filtered(|o| o.treatment_group == TreatmentGroup::Treatment);
        construct_treatment_variables(&mut treated_only).unwrap();
        let err = run_did_regression(&treated_only, Outcome::LogAvgMonthlyEmployment).unwrap_err();
        match err {
            Error::Regression(msg) => {
                assert!(msg.contains("`treated`"), "{msg}");
                assert!(msg.contains("8 surviving rows"), "{msg}");
            }
            other => panic!("expected Regression, got {other:?}"),
        }
    }

    #[test]
    fn control_without_pre_era_is_rank_deficient() {
        // Every column varies, but const = treated + biden_era - treated_biden.
        let p = panel(-0.2);
        let mut no_control_pre = p.filtered(|o| {
            o.treatment_group == TreatmentGroup::Treatment || o.treatment_period() == PolicyEra::BidenEra
        });
        construct_treatment_variables(&mut no_control_pre).unwrap();
        assert_eq!(no_control_pre.len(), 12);

        let err = run_did_regression(&no_control_pre, Outcome::LogAvgMonthlyEmployment).unwrap_err();
        match err {
            Error::Regression(msg) => {
                assert!(msg.starts_with("log_avg_monthly_employment: "), "{msg}");
                assert!(msg.contains("rank-deficient (rank 3 < 4 columns, 12 rows)"), "{msg}");
            }
            other => panic!("expected Regression, got {other:?}"),
        }
    }

    #[test]
    fn relaxed_specification_omits_interaction() {
        let p = panel(-0.2);
        let m = run_did_regression_with(
            &p,
            Outcome::LogAvgMonthlyEmployment,
            &DidSpecification::without_interaction(),
        )
        .unwrap();
        assert_eq!(m.names(), vec!["const", "treated", "biden_era"]);
        assert!(m.coefficient(TREATED_BIDEN).is_none());
        assert!(m.p_value(TREATED).unwrap() <= 1.0);
    }

    #[test]
    fn p_value_reference_points() {
        assert_abs_diff_eq!(two_sided_p(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(two_sided_p(1.959_963_984_540_054), 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(two_sided_p(-1.959_963_984_540_054), 0.05, epsilon = 1e-9);
    }
}
