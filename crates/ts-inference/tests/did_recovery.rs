//! DiD coefficient recovery on a simulated steel-tariff panel.
//!
//! Three industries (two treated, one control), quarterly 2014–2023, five
//! reporting areas each, log employment generated from known coefficients.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use ts_core::{EraBoundary, Error, Observation, Outcome, Panel, Quarter, TreatmentGroup};
use ts_inference::{
    calculate_economic_effects, construct_treatment_variables, run_did_regression,
};

const ALPHA: f64 = 4.0;
const BETA_TREATED: f64 = 0.3;
const BETA_ERA: f64 = 0.05;
const DELTA: f64 = -0.08;

fn simulate(seed: u64) -> Panel {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let eps = Normal::new(0.0, 0.02).unwrap();
    let boundary = EraBoundary::default();

    let industries = [
        ("Iron_steel", "Iron and Steel", TreatmentGroup::Treatment),
        ("MotorVehicle", "Motor Vehicle", TreatmentGroup::Treatment),
        ("Textile_Mill", "Textile Mills", TreatmentGroup::Control),
    ];

    let mut rows = Vec::new();
    for (key, name, group) in industries {
        let d = f64::from(u8::from(group == TreatmentGroup::Treatment));
        for year in 2014..=2023 {
            for qtr in 1..=4 {
                let quarter = Quarter::new(year, qtr).unwrap();
                let era = boundary.era_of(&quarter);
                let p = f64::from(u8::from(era == ts_core::PolicyEra::BidenEra));
                for area in 0..5 {
                    let log_emp = ALPHA
                        + BETA_TREATED * d
                        + BETA_ERA * p
                        + DELTA * d * p
                        + eps.sample(&mut rng);
                    let mut obs = Observation::new(key, name, group, quarter, &boundary).with_measures(
                        Some(log_emp.exp()),
                        Some(1.0e6),
                        Some(1000.0),
                    );
                    obs.area_fips = Some(format!("{:02}000", area + 1));
                    obs.own_code = Some("5".into());
                    rows.push(obs);
                }
            }
        }
    }
    let mut panel = Panel::new(rows);
    construct_treatment_variables(&mut panel).unwrap();
    panel
}

#[test]
fn recovers_interaction_and_main_effects() {
    let panel = simulate(42);
    assert_eq!(panel.len(), 3 * 40 * 5);

    let model = run_did_regression(&panel, Outcome::LogAvgMonthlyEmployment).unwrap();
    let delta = model.coefficient("treated_biden").unwrap();
    assert!((delta.estimate - DELTA).abs() < 0.015, "delta = {}", delta.estimate);
    assert!(delta.p_value < 0.05, "p = {}", delta.p_value);
    assert!(delta.ci_lower < delta.estimate && delta.estimate < delta.ci_upper);
    assert!(delta.ci_upper < 0.0);

    let treated = model.param("treated").unwrap();
    assert!((treated - BETA_TREATED).abs() < 0.015, "treated = {treated}");
    let era = model.param("biden_era").unwrap();
    assert!((era - BETA_ERA).abs() < 0.015, "biden_era = {era}");

    assert_eq!(model.n_obs(), 600);
    assert_eq!(model.df_resid(), 596);
    assert!(model.r_squared() > 0.9);
}

#[test]
fn percentage_effect_near_truth() {
    let panel = simulate(7);
    let model = run_did_regression(&panel, Outcome::LogAvgMonthlyEmployment).unwrap();
    let fx = calculate_economic_effects(&model).unwrap();
    // exp(-0.08) - 1 = -7.69%
    let pct = fx.biden_interaction_pct.unwrap();
    assert!((pct + 7.69).abs() < 1.5, "pct = {pct}");
    assert_eq!(fx.biden_interaction_significant, Some(true));
    assert_eq!(fx.treatment_significant, Some(true));
}

#[test]
fn hc3_errors_are_positive_and_finite() {
    let panel = simulate(11);
    let model = run_did_regression(&panel, Outcome::LogAvgMonthlyEmployment).unwrap();
    for c in model.coefficients() {
        assert!(c.std_error.is_finite() && c.std_error > 0.0, "{}: {}", c.name, c.std_error);
        assert!(c.std_error_ols.is_finite() && c.std_error_ols > 0.0);
    }
}

#[test]
fn single_group_panel_is_not_identified() {
    let panel = simulate(3);
    let mut control_only = panel.filtered(|o| o.treatment_group == TreatmentGroup::Control);
    construct_treatment_variables(&mut control_only).unwrap();
    let err = run_did_regression(&control_only, Outcome::LogAvgMonthlyEmployment).unwrap_err();
    assert!(matches!(err, Error::Regression(_)), "{err}");
}
