//! Employment trend artifact.
//!
//! One series per industry: the mean `avg_monthly_employment` of every
//! (industry, quarter) group, dated at the quarter start. Two vertical markers
//! annotate the tariff implementation and the administration change.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_core::{Panel, PolicyDates, Quarter, Result, TreatmentGroup};

/// Figure title.
pub const TITLE: &str = "Employment Trends by Industry: Steel Tariff Effects";
/// X-axis label.
pub const X_LABEL: &str = "Quarter";
/// Y-axis label.
pub const Y_LABEL: &str = "Average Monthly Employment per Establishment";

/// Label of the tariff marker.
pub const TARIFF_LABEL: &str = "Steel Tariffs Implemented";
/// Label of the administration-change marker.
pub const ADMINISTRATION_LABEL: &str = "Biden Administration";

const TARIFF_COLOR: &str = "#d62728";
const ADMINISTRATION_COLOR: &str = "#ff7f0e";

/// Trend plot artifact (`tariffstat_trends_v0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsArtifact {
    /// Schema identifier.
    pub schema_version: String,
    /// Provenance.
    pub meta: TrendsMeta,
    /// Figure title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Series in order of first appearance of the industry in the panel.
    pub series: Vec<TrendSeries>,
    /// Vertical policy-date markers.
    pub markers: Vec<PolicyMarker>,
}

/// Artifact provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsMeta {
    /// Producing tool.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
    /// Creation time.
    pub created_unix_ms: u128,
}

/// One industry line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Industry display name (legend label).
    pub industry_name: String,
    /// Treatment group of the industry.
    pub treatment_group: TreatmentGroup,
    /// Points sorted by date.
    pub points: Vec<TrendPoint>,
}

/// Mean employment in one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Quarter of the group.
    pub quarter: Quarter,
    /// Quarter start date (x position).
    pub date: NaiveDate,
    /// Group mean of `avg_monthly_employment`.
    pub value: f64,
}

/// Dashed vertical line at a policy date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyMarker {
    /// Marker position.
    pub date: NaiveDate,
    /// Legend label.
    pub label: String,
    /// Hex color.
    pub color: String,
}

/// Build the trend artifact from a labeled panel.
///
/// Missing employment values are skipped within a group; a group with no
/// values contributes no point, and an industry with no points no series.
pub fn employment_trends_artifact(panel: &Panel, dates: &PolicyDates) -> Result<TrendsArtifact> {
    let mut series = Vec::new();
    for name in panel.industry_names() {
        let mut by_quarter: BTreeMap<Quarter, (f64, usize)> = BTreeMap::new();
        let mut group = None;
        for o in panel.rows().iter().filter(|o| o.industry_name == name) {
            group.get_or_insert(o.treatment_group);
            if let Some(v) = o.avg_monthly_employment.filter(|v| v.is_finite()) {
                let acc = by_quarter.entry(o.quarter()).or_insert((0.0, 0));
                acc.0 += v;
                acc.1 += 1;
            }
        }
        let Some(treatment_group) = group else { continue };
        if by_quarter.is_empty() {
            log::debug!("trends: `{name}` has no employment values; series omitted");
            continue;
        }
        let points = by_quarter
            .into_iter()
            .map(|(quarter, (sum, n))| TrendPoint {
                quarter,
                date: quarter.start_date(),
                value: sum / n as f64,
            })
            .collect();
        series.push(TrendSeries { industry_name: name.to_string(), treatment_group, points });
    }

    Ok(TrendsArtifact {
        schema_version: "tariffstat_trends_v0".to_string(),
        meta: TrendsMeta {
            tool: "tariffstat".to_string(),
            tool_version: ts_core::VERSION.to_string(),
            created_unix_ms: crate::now_unix_ms()?,
        },
        title: TITLE.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        series,
        markers: vec![
            PolicyMarker {
                date: dates.tariff_implemented,
                label: TARIFF_LABEL.to_string(),
                color: TARIFF_COLOR.to_string(),
            },
            PolicyMarker {
                date: dates.administration_change,
                label: ADMINISTRATION_LABEL.to_string(),
                color: ADMINISTRATION_COLOR.to_string(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::{EraBoundary, Observation};

    fn obs(name: &str, q: &str, emp: Option<f64>) -> Observation {
        let quarter: Quarter = q.parse().unwrap();
        let group = if name == "Textile Mills" { TreatmentGroup::Control } else { TreatmentGroup::Treatment };
        Observation::new(name.replace(' ', "_"), name, group, quarter, &EraBoundary::default())
            .with_measures(emp, None, None)
    }

    #[test]
    fn groups_by_quarter_and_orders_series() {
        let panel = Panel::new(vec![
            obs("Textile Mills", "2019Q2", Some(20.0)),
            obs("Iron and Steel", "2019Q2", Some(10.0)),
            obs("Textile Mills", "2019Q1", Some(30.0)),
            obs("Textile Mills", "2019Q2", Some(40.0)),
            obs("Textile Mills", "2019Q2", None),
            obs("Iron and Steel", "2019Q3", None),
        ]);
        let art = employment_trends_artifact(&panel, &PolicyDates::default()).unwrap();

        assert_eq!(art.schema_version, "tariffstat_trends_v0");
        let names: Vec<&str> = art.series.iter().map(|s| s.industry_name.as_str()).collect();
        assert_eq!(names, vec!["Textile Mills", "Iron and Steel"]);

        let textile = &art.series[0];
        assert_eq!(textile.treatment_group, TreatmentGroup::Control);
        assert_eq!(textile.points.len(), 2);
        assert_eq!(textile.points[0].quarter.to_string(), "2019Q1");
        assert_eq!(textile.points[0].date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert!((textile.points[1].value - 30.0).abs() < 1e-12);

        // 2019Q3 had only a missing value.
        assert_eq!(art.series[1].points.len(), 1);
    }

    #[test]
    fn markers_follow_policy_dates() {
        let art = employment_trends_artifact(&Panel::default(), &PolicyDates::default()).unwrap();
        assert!(art.series.is_empty());
        assert_eq!(art.markers.len(), 2);
        assert_eq!(art.markers[0].label, TARIFF_LABEL);
        assert_eq!(art.markers[0].date, ts_core::calendar::TARIFF_IMPLEMENTED);
        assert_eq!(art.markers[1].label, ADMINISTRATION_LABEL);
        assert_eq!(art.markers[1].date, ts_core::calendar::ADMINISTRATION_CHANGE);
    }

    #[test]
    fn artifact_json_round_trips() {
        let panel = Panel::new(vec![obs("Motor Vehicle", "2022Q4", Some(55.5))]);
        let art = employment_trends_artifact(&panel, &PolicyDates::default()).unwrap();
        let json = serde_json::to_string(&art).unwrap();
        assert!(json.contains("\"quarter\":\"2022Q4\""));
        assert!(json.contains("\"date\":\"2022-10-01\""));
        let back: TrendsArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.series, art.series);
        assert_eq!(back.markers, art.markers);
    }
}
