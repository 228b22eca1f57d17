//! Descriptive statistics by industry and policy era.
//!
//! Groups are keyed by (industry name, era label) and come out sorted on that
//! key, so `biden_era` precedes `pre` within an industry. Every statistic is
//! rounded to two decimals; a statistic over too few values is `None`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use ts_core::{Panel, PolicyEra, Result};

/// Count, mean, sample standard deviation and median of employment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmploymentStats {
    /// Non-missing values.
    pub count: usize,
    /// Mean.
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1).
    pub std: Option<f64>,
    /// Median.
    pub median: Option<f64>,
}

/// Mean and sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanStd {
    /// Mean.
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1).
    pub std: Option<f64>,
}

/// One (industry, era) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Industry display name.
    pub industry_name: String,
    /// Policy era.
    pub treatment_period: PolicyEra,
    /// `avg_monthly_employment`.
    pub employment: EmploymentStats,
    /// `total_qtrly_wages`.
    pub total_qtrly_wages: MeanStd,
    /// `avg_wkly_wage`.
    pub avg_wkly_wage: MeanStd,
}

/// Grouped summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Rows sorted by industry name, then era label.
    pub rows: Vec<SummaryRow>,
}

const HEADER: [&str; 10] = [
    "industry_name",
    "treatment_period",
    "employment_count",
    "employment_mean",
    "employment_std",
    "employment_median",
    "total_qtrly_wages_mean",
    "total_qtrly_wages_std",
    "avg_wkly_wage_mean",
    "avg_wkly_wage_std",
];

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() { None } else { Some(xs.iter().sum::<f64>() / xs.len() as f64) }
}

fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut v = xs.to_vec();
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    Some(if v.len() % 2 == 0 { (v[mid - 1] + v[mid]) / 2.0 } else { v[mid] })
}

#[derive(Default)]
struct Columns {
    employment: Vec<f64>,
    wages: Vec<f64>,
    weekly: Vec<f64>,
}

fn push(col: &mut Vec<f64>, v: Option<f64>) {
    if let Some(x) = v.filter(|x| x.is_finite()) {
        col.push(x);
    }
}

fn mean_std(xs: &[f64]) -> MeanStd {
    MeanStd { mean: mean(xs).map(round2), std: sample_std(xs).map(round2) }
}

/// Group the panel by (industry, era) and summarize each numeric column.
pub fn summary_statistics(panel: &Panel) -> SummaryTable {
    let mut groups: BTreeMap<(String, &'static str), (PolicyEra, Columns)> = BTreeMap::new();
    for o in panel.rows() {
        let (_, cols) = groups
            .entry((o.industry_name.clone(), o.treatment_period().as_str()))
            .or_insert_with(|| (o.treatment_period(), Columns::default()));
        push(&mut cols.employment, o.avg_monthly_employment);
        push(&mut cols.wages, o.total_qtrly_wages);
        push(&mut cols.weekly, o.avg_wkly_wage);
    }

    let rows = groups
        .into_iter()
        .map(|((industry_name, _), (era, cols))| SummaryRow {
            industry_name,
            treatment_period: era,
            employment: EmploymentStats {
                count: cols.employment.len(),
                mean: mean(&cols.employment).map(round2),
                std: sample_std(&cols.employment).map(round2),
                median: median(&cols.employment).map(round2),
            },
            total_qtrly_wages: mean_std(&cols.wages),
            avg_wkly_wage: mean_std(&cols.weekly),
        })
        .collect();

    SummaryTable { rows }
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_default()
}

impl SummaryRow {
    fn cells(&self) -> [String; 10] {
        [
            self.industry_name.clone(),
            self.treatment_period.to_string(),
            self.employment.count.to_string(),
            cell(self.employment.mean),
            cell(self.employment.std),
            cell(self.employment.median),
            cell(self.total_qtrly_wages.mean),
            cell(self.total_qtrly_wages.std),
            cell(self.avg_wkly_wage.mean),
            cell(self.avg_wkly_wage.std),
        ]
    }
}

impl SummaryTable {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the panel had no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV (empty cells for undefined statistics).
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(HEADER)?;
        for row in &self.rows {
            wtr.write_record(row.cells())?;
        }
        wtr.flush()?;
        log::info!("wrote summary table ({} groups) to {}", self.rows.len(), path.display());
        Ok(())
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<[String; 10]> = self.rows.iter().map(SummaryRow::cells).collect();
        let mut widths = HEADER.map(str::len);
        for r in &body {
            for (w, c) in widths.iter_mut().zip(r) {
                *w = (*w).max(c.len());
            }
        }

        for (i, (h, w)) in HEADER.iter().zip(widths).enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            if i < 2 { write!(f, "{h:<w$}")? } else { write!(f, "{h:>w$}")? }
        }
        writeln!(f)?;
        for r in &body {
            for (i, (c, w)) in r.iter().zip(widths).enumerate() {
                if i > 0 {
                    f.write_str("  ")?;
                }
                let c = if c.is_empty() { "-" } else { c.as_str() };
                if i < 2 { write!(f, "{c:<w$}")? } else { write!(f, "{c:>w$}")? }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
