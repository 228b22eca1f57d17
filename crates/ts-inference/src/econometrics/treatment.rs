//! Treatment-indicator construction.

use ts_core::{Error, Observation, Panel, PolicyEra, Result, TreatmentGroup, TreatmentIndicators};

/// Indicator columns for `rows`, in row order.
pub fn treatment_indicators(rows: &[Observation]) -> TreatmentIndicators {
    let n = rows.len();
    let mut treated = Vec::with_capacity(n);
    let mut biden_era = Vec::with_capacity(n);
    let mut treated_biden = Vec::with_capacity(n);

    for o in rows {
        let d = u8::from(o.treatment_group == TreatmentGroup::Treatment);
        let p = u8::from(o.treatment_period() == PolicyEra::BidenEra);
        treated.push(d);
        biden_era.push(p);
        treated_biden.push(d * p);
    }

    TreatmentIndicators { treated, biden_era, treated_biden }
}

/// Add `treated`, `biden_era` and `treated_biden` to the panel.
///
/// Re-running overwrites the three columns with identical values.
pub fn construct_treatment_variables(panel: &mut Panel) -> Result<()> {
    if panel.is_empty() {
        return Err(Error::Schema(
            "cannot construct treatment indicators: columns `treatment_group` and \
             `treatment_period` have no rows"
                .into(),
        ));
    }
    let indicators = treatment_indicators(panel.rows());
    panel.set_indicators(indicators)
}
