//! Common data types for tariffstat

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::{EraBoundary, Quarter};
use crate::{Error, Result};

/// Treatment-group label of an industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentGroup {
    /// Exposed to the tariff.
    Treatment,
    /// Counterfactual baseline.
    Control,
}

impl TreatmentGroup {
    /// Label as written in tables (`treatment` / `control`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Treatment => "treatment",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for TreatmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "treatment" => Ok(Self::Treatment),
            "control" => Ok(Self::Control),
            other => Err(Error::Validation(format!(
                "treatment group must be `treatment` or `control`, got `{other}`"
            ))),
        }
    }
}

/// Coarse policy period of a quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyEra {
    /// Before the administration change.
    Pre,
    /// On or after the administration change.
    BidenEra,
}

impl PolicyEra {
    /// Label as written in tables (`pre` / `biden_era`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::BidenEra => "biden_era",
        }
    }
}

impl fmt::Display for PolicyEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled row: an industry in a quarter (or finer, per area/ownership).
///
/// The quarter and its policy era are fixed at construction, so a row can
/// never carry an era that disagrees with the boundary it was built against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Key in the industry mapping (e.g. `Iron_steel`).
    pub industry_key: String,
    /// Display name (e.g. `Iron and Steel`).
    pub industry_name: String,
    /// Fixed by the industry mapping.
    pub treatment_group: TreatmentGroup,
    quarter: Quarter,
    treatment_period: PolicyEra,
    /// Mean monthly employment, per establishment when the count is known.
    pub avg_monthly_employment: Option<f64>,
    /// Total quarterly wages.
    pub total_qtrly_wages: Option<f64>,
    /// Average weekly wage.
    pub avg_wkly_wage: Option<f64>,
    /// QCEW area code, when the source carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_fips: Option<String>,
    /// QCEW ownership code, when the source carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_code: Option<String>,
}

impl Observation {
    /// Row for `quarter`, with its era derived from `boundary` and no measures.
    pub fn new(
        industry_key: impl Into<String>,
        industry_name: impl Into<String>,
        treatment_group: TreatmentGroup,
        quarter: Quarter,
        boundary: &EraBoundary,
    ) -> Self {
        Self {
            industry_key: industry_key.into(),
            industry_name: industry_name.into(),
            treatment_group,
            quarter,
            treatment_period: boundary.era_of(&quarter),
            avg_monthly_employment: None,
            total_qtrly_wages: None,
            avg_wkly_wage: None,
            area_fips: None,
            own_code: None,
        }
    }

    /// Set the three outcome measures.
    pub fn with_measures(
        mut self,
        avg_monthly_employment: Option<f64>,
        total_qtrly_wages: Option<f64>,
        avg_wkly_wage: Option<f64>,
    ) -> Self {
        self.avg_monthly_employment = avg_monthly_employment;
        self.total_qtrly_wages = total_qtrly_wages;
        self.avg_wkly_wage = avg_wkly_wage;
        self
    }

    /// Period of the record.
    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    /// Policy era of [`Observation::quarter`].
    pub fn treatment_period(&self) -> PolicyEra {
        self.treatment_period
    }
}

/// Binary indicator columns of the DiD design, row-aligned with a [`Panel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreatmentIndicators {
    /// 1 iff the row's group is `treatment`.
    pub treated: Vec<u8>,
    /// 1 iff the row's era is `biden_era`.
    pub biden_era: Vec<u8>,
    /// `treated * biden_era`.
    pub treated_biden: Vec<u8>,
}

impl TreatmentIndicators {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.treated.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.treated.is_empty()
    }

    fn validate(&self, n: usize) -> Result<()> {
        if self.treated.len() != n || self.biden_era.len() != n || self.treated_biden.len() != n {
            return Err(Error::Validation(format!(
                "indicator columns must have {n} rows, got treated={} biden_era={} treated_biden={}",
                self.treated.len(),
                self.biden_era.len(),
                self.treated_biden.len()
            )));
        }
        for i in 0..n {
            let (d, p, dp) = (self.treated[i], self.biden_era[i], self.treated_biden[i]);
            if d > 1 || p > 1 {
                return Err(Error::Validation(format!("row {i}: indicators must be 0 or 1")));
            }
            if dp != d * p {
                return Err(Error::Validation(format!(
                    "row {i}: treated_biden ({dp}) != treated ({d}) * biden_era ({p})"
                )));
            }
        }
        Ok(())
    }
}

/// In-memory analysis table.
///
/// Rows keep ingestion order. Indicator columns exist only after treatment
/// variable construction and are discarded whenever the row set changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Panel {
    rows: Vec<Observation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicators: Option<TreatmentIndicators>,
}

impl Panel {
    /// Panel over `rows`, without indicators.
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows, indicators: None }
    }

    /// All rows in table order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indicator columns, if constructed.
    pub fn indicators(&self) -> Option<&TreatmentIndicators> {
        self.indicators.as_ref()
    }

    /// Attach indicator columns, replacing any previous ones.
    pub fn set_indicators(&mut self, indicators: TreatmentIndicators) -> Result<()> {
        indicators.validate(self.rows.len())?;
        self.indicators = Some(indicators);
        Ok(())
    }

    /// Append rows (drops indicators).
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Observation>) {
        self.rows.extend(rows);
        self.indicators = None;
    }

    /// New panel with the rows matching `keep`, in order, without indicators.
    pub fn filtered(&self, keep: impl Fn(&Observation) -> bool) -> Self {
        Self::new(self.rows.iter().filter(|o| keep(o)).cloned().collect())
    }

    /// Industry display names in order of first appearance.
    pub fn industry_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for o in &self.rows {
            if !seen.contains(&o.industry_name.as_str()) {
                seen.push(&o.industry_name);
            }
        }
        seen
    }
}

/// Numeric outcome column usable as the regression's dependent variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `avg_monthly_employment`
    AvgMonthlyEmployment,
    /// `total_qtrly_wages`
    TotalQtrlyWages,
    /// `avg_wkly_wage`
    AvgWklyWage,
    /// `log_avg_monthly_employment`
    LogAvgMonthlyEmployment,
    /// `log_total_qtrly_wages`
    LogTotalQtrlyWages,
    /// `log_avg_wkly_wage`
    LogAvgWklyWage,
}

impl Outcome {
    /// Every outcome, levels first.
    pub const ALL: [Outcome; 6] = [
        Self::AvgMonthlyEmployment,
        Self::TotalQtrlyWages,
        Self::AvgWklyWage,
        Self::LogAvgMonthlyEmployment,
        Self::LogTotalQtrlyWages,
        Self::LogAvgWklyWage,
    ];

    /// Column name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AvgMonthlyEmployment => "avg_monthly_employment",
            Self::TotalQtrlyWages => "total_qtrly_wages",
            Self::AvgWklyWage => "avg_wkly_wage",
            Self::LogAvgMonthlyEmployment => "log_avg_monthly_employment",
            Self::LogTotalQtrlyWages => "log_total_qtrly_wages",
            Self::LogAvgWklyWage => "log_avg_wkly_wage",
        }
    }

    /// True for natural-log outcomes, where `exp(β) − 1` reads as a percentage change.
    pub fn is_log(&self) -> bool {
        matches!(self, Self::LogAvgMonthlyEmployment | Self::LogTotalQtrlyWages | Self::LogAvgWklyWage)
    }

    /// Value for one row; `None` when missing (or non-positive for log outcomes).
    pub fn value(&self, obs: &Observation) -> Option<f64> {
        let level = match self {
            Self::AvgMonthlyEmployment | Self::LogAvgMonthlyEmployment => obs.avg_monthly_employment,
            Self::TotalQtrlyWages | Self::LogTotalQtrlyWages => obs.total_qtrly_wages,
            Self::AvgWklyWage | Self::LogAvgWklyWage => obs.avg_wkly_wage,
        }?;
        if !level.is_finite() {
            return None;
        }
        if self.is_log() {
            if level > 0.0 { Some(level.ln()) } else { None }
        } else {
            Some(level)
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.iter().copied().find(|o| o.name() == s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|o| o.name()).collect();
            Error::Schema(format!("unknown outcome column `{s}` (expected one of: {})", known.join(", ")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str, group: TreatmentGroup, q: &str, emp: Option<f64>) -> Observation {
        Observation::new(name.replace(' ', "_"), name, group, q.parse().unwrap(), &EraBoundary::default())
            .with_measures(emp, Some(1.0e6), Some(0.0))
    }

    #[test]
    fn era_follows_the_boundary_it_was_built_against() {
        let q: Quarter = "2021Q1".parse().unwrap();
        let build = |b: &EraBoundary| Observation::new("Iron_steel", "Iron and Steel", TreatmentGroup::Treatment, q, b);
        let default = build(&EraBoundary::default());
        assert_eq!(default.quarter(), q);
        assert_eq!(default.treatment_period(), PolicyEra::BidenEra);

        // 2021Q1 ends 2021-03-31, before a later boundary.
        let later = EraBoundary::new(chrono::NaiveDate::from_ymd_opt(2021, 4, 1).unwrap());
        let shifted = build(&later);
        assert_eq!(shifted.treatment_period(), PolicyEra::Pre);
        assert_ne!(default, shifted);

        let json = serde_json::to_value(&shifted).unwrap();
        assert_eq!(json["quarter"], "2021Q1");
        assert_eq!(json["treatment_period"], "pre");
        assert!(json.get("area_fips").is_none());
    }

    #[test]
    fn outcome_names_roundtrip() {
        for o in Outcome::ALL {
            assert_eq!(o.name().parse::<Outcome>().unwrap(), o);
        }
        let err = "employment".parse::<Outcome>().unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn log_outcome_values() {
        let o = obs("Textile Mills", TreatmentGroup::Control, "2019Q1", Some(std::f64::consts::E));
        assert!((Outcome::LogAvgMonthlyEmployment.value(&o).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(Outcome::AvgMonthlyEmployment.value(&o), Some(std::f64::consts::E));
        // Non-positive levels have no log.
        assert_eq!(Outcome::LogAvgWklyWage.value(&o), None);
        assert_eq!(Outcome::AvgWklyWage.value(&o), Some(0.0));
        assert!(Outcome::LogTotalQtrlyWages.is_log());
        assert!(!Outcome::TotalQtrlyWages.is_log());
    }

    #[test]
    fn panel_indicators_validated() {
        let mut panel = Panel::new(vec![
            obs("Iron and Steel", TreatmentGroup::Treatment, "2019Q1", Some(10.0)),
            obs("Iron and Steel", TreatmentGroup::Treatment, "2021Q2", Some(11.0)),
        ]);
        let bad = TreatmentIndicators {
            treated: vec![1, 1],
            biden_era: vec![0, 1],
            treated_biden: vec![0, 0],
        };
        assert!(panel.set_indicators(bad).is_err());

        let short = TreatmentIndicators { treated: vec![1], biden_era: vec![0], treated_biden: vec![0] };
        assert!(panel.set_indicators(short).is_err());

        let good = TreatmentIndicators {
            treated: vec![1, 1],
            biden_era: vec![0, 1],
            treated_biden: vec![0, 1],
        };
        panel.set_indicators(good).unwrap();
        assert_eq!(panel.indicators().unwrap().len(), 2);

        panel.extend(vec![obs("Textile Mills", TreatmentGroup::Control, "2019Q1", None)]);
        assert!(panel.indicators().is_none());
    }

    #[test]
    fn industry_names_first_appearance() {
        let panel = Panel::new(vec![
            obs("Motor Vehicle", TreatmentGroup::Treatment, "2019Q1", None),
            obs("Iron and Steel", TreatmentGroup::Treatment, "2019Q1", None),
            obs("Motor Vehicle", TreatmentGroup::Treatment, "2019Q2", None),
        ]);
        assert_eq!(panel.industry_names(), vec!["Motor Vehicle", "Iron and Steel"]);
        let only_mv = panel.filtered(|o| o.industry_name == "Motor Vehicle");
        assert_eq!(only_mv.len(), 2);
    }

    #[test]
    fn labels_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&PolicyEra::BidenEra).unwrap(), "\"biden_era\"");
        assert_eq!(serde_json::to_string(&TreatmentGroup::Control).unwrap(), "\"control\"");
        assert_eq!("treatment".parse::<TreatmentGroup>().unwrap(), TreatmentGroup::Treatment);
        assert!("treated".parse::<TreatmentGroup>().is_err());
    }
}
