//! Labeled panel → CSV.

use std::path::Path;

use ts_core::{Panel, Result};

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Write the labeled panel, plus indicator columns when they have been built.
pub fn write_panel_csv(panel: &Panel, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec![
        "industry_key",
        "industry_name",
        "treatment_group",
        "quarter",
        "quarter_date",
        "treatment_period",
        "area_fips",
        "own_code",
        "avg_monthly_employment",
        "total_qtrly_wages",
        "avg_wkly_wage",
    ];
    let indicators = panel.indicators();
    if indicators.is_some() {
        header.extend(["treated", "biden_era", "treated_biden"]);
    }
    wtr.write_record(&header)?;

    for (i, o) in panel.rows().iter().enumerate() {
        let mut rec = vec![
            o.industry_key.clone(),
            o.industry_name.clone(),
            o.treatment_group.to_string(),
            o.quarter().to_string(),
            o.quarter().start_date().to_string(),
            o.treatment_period().to_string(),
            o.area_fips.clone().unwrap_or_default(),
            o.own_code.clone().unwrap_or_default(),
            fmt_opt(o.avg_monthly_employment),
            fmt_opt(o.total_qtrly_wages),
            fmt_opt(o.avg_wkly_wage),
        ];
        if let Some(ind) = indicators {
            rec.push(ind.treated[i].to_string());
            rec.push(ind.biden_era[i].to_string());
            rec.push(ind.treated_biden[i].to_string());
        }
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    log::info!("wrote {} panel rows to {}", panel.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::{EraBoundary, Observation, Quarter, TreatmentGroup};

    #[test]
    fn writes_header_and_missing_cells() {
        let q: Quarter = "2021Q1".parse().unwrap();
        let panel = Panel::new(vec![
            Observation::new("Textile_Mill", "Textile Mills", TreatmentGroup::Control, q, &EraBoundary::default())
                .with_measures(Some(12.5), None, Some(800.0)),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        write_panel_csv(&panel, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("industry_key,industry_name,treatment_group"));
        assert_eq!(
            lines.next().unwrap(),
            "Textile_Mill,Textile Mills,control,2021Q1,2021-01-01,biden_era,,,12.5,,800"
        );
    }
}
