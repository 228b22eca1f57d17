//! Ingestion & labeling: per-industry extracts → one labeled [`Panel`].

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_core::{EraBoundary, Error, Observation, Panel, Result, TreatmentGroup};

use crate::qcew::{ColumnIndex, parse_row};

/// Metadata attached to every row of one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryInfo {
    /// Mapping key; also the default file stem.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Fixed group assignment.
    pub treatment_group: TreatmentGroup,
    /// Source file, relative to the data directory. Defaults to `<key>.csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl IndustryInfo {
    /// Industry with the default source file.
    pub fn new(key: &str, name: &str, treatment_group: TreatmentGroup) -> Self {
        Self { key: key.to_string(), name: name.to_string(), treatment_group, file: None }
    }

    /// Resolved source path under `data_dir`.
    pub fn source_path(&self, data_dir: &Path) -> PathBuf {
        match &self.file {
            Some(f) if f.is_absolute() => f.clone(),
            Some(f) => data_dir.join(f),
            None => data_dir.join(format!("{}.csv", self.key)),
        }
    }
}

/// Ordered industry key → metadata mapping. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndustryMapping {
    entries: Vec<IndustryInfo>,
}

impl IndustryMapping {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping from entries in iteration order; duplicate keys are rejected.
    pub fn from_entries(entries: impl IntoIterator<Item = IndustryInfo>) -> Result<Self> {
        let mut m = Self::new();
        for e in entries {
            m.insert(e)?;
        }
        Ok(m)
    }

    /// The steel-tariff study: two treated industries and one control.
    pub fn steel_tariff_default() -> Self {
        Self {
            entries: vec![
                IndustryInfo::new("Iron_steel", "Iron and Steel", TreatmentGroup::Treatment),
                IndustryInfo::new("MotorVehicle", "Motor Vehicle", TreatmentGroup::Treatment),
                IndustryInfo::new("Textile_Mill", "Textile Mills", TreatmentGroup::Control),
            ],
        }
    }

    /// Append an industry.
    pub fn insert(&mut self, info: IndustryInfo) -> Result<()> {
        if self.get(&info.key).is_some() {
            return Err(Error::Validation(format!("duplicate industry key `{}`", info.key)));
        }
        self.entries.push(info);
        Ok(())
    }

    /// Lookup by key.
    pub fn get(&self, key: &str) -> Option<&IndustryInfo> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Industries in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = &IndustryInfo> {
        self.entries.iter()
    }

    /// Number of industries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What to do when one industry's source cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIndustryPolicy {
    /// Log a warning, record it in [`LoadReport::skipped`], continue.
    #[default]
    Skip,
    /// Abort the whole load.
    Fail,
}

/// Ingestion options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Unreadable/malformed industry handling.
    pub missing_industry: MissingIndustryPolicy,
    /// Era derivation.
    pub era_boundary: EraBoundary,
}

/// An industry left out of the panel.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedIndustry {
    /// Mapping key.
    pub key: String,
    /// Error text.
    pub reason: String,
}

/// Per-industry outcome of [`load_panel`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// `(key, rows)` for each loaded industry, in mapping order.
    pub loaded: Vec<(String, usize)>,
    /// Industries skipped under [`MissingIndustryPolicy::Skip`].
    pub skipped: Vec<SkippedIndustry>,
}

impl LoadReport {
    /// Total loaded rows.
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|(_, n)| n).sum()
    }
}

/// Load and label every industry in `mapping` from `data_dir`.
///
/// Rows keep file order within an industry; industries are concatenated in
/// mapping order. A missing required column is always fatal
/// ([`Error::Schema`]). An unreadable or malformed source is fatal to that
/// industry and, depending on [`LoadOptions::missing_industry`], skipped or
/// propagated.
pub fn load_panel(
    data_dir: &Path,
    mapping: &IndustryMapping,
    options: &LoadOptions,
) -> Result<(Panel, LoadReport)> {
    if mapping.is_empty() {
        return Err(Error::Validation("industry mapping is empty".into()));
    }

    let mut rows: Vec<Observation> = Vec::new();
    let mut report = LoadReport::default();

    for info in mapping.iter() {
        let path = info.source_path(data_dir);
        match load_industry(&path, info, &options.era_boundary) {
            Ok(industry_rows) => {
                log::debug!("loaded {} rows for `{}` from {}", industry_rows.len(), info.key, path.display());
                report.loaded.push((info.key.clone(), industry_rows.len()));
                rows.extend(industry_rows);
            }
            Err(err @ Error::DataLoad { .. }) => match options.missing_industry {
                MissingIndustryPolicy::Skip => {
                    log::warn!("skipping industry `{}`: {err}", info.key);
                    report.skipped.push(SkippedIndustry { key: info.key.clone(), reason: err.to_string() });
                }
                MissingIndustryPolicy::Fail => return Err(err),
            },
            Err(err) => return Err(err),
        }
    }

    if rows.is_empty() {
        return Err(Error::data_load("*", data_dir, "no industry data loaded"));
    }

    log::info!(
        "loaded {} rows from {} industries ({} skipped)",
        rows.len(),
        report.loaded.len(),
        report.skipped.len()
    );
    Ok((Panel::new(rows), report))
}

/// Load one industry's extract from a file.
pub fn load_industry(path: &Path, info: &IndustryInfo, boundary: &EraBoundary) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::data_load(&info.key, path, format!("cannot open: {e}")))?;
    read_industry(file, path, info, boundary)
}

/// Load one industry's extract from any reader; `path` is used for error context.
pub fn read_industry<R: Read>(
    reader: R,
    path: &Path,
    info: &IndustryInfo,
    boundary: &EraBoundary,
) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::data_load(&info.key, path, format!("failed to read header: {e}")))?
        .clone();
    let cols = ColumnIndex::from_headers(&headers).map_err(|missing| {
        Error::Schema(format!(
            "industry `{}` ({}): missing required column(s): {}",
            info.key,
            path.display(),
            missing.join(", ")
        ))
    })?;

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let record = record
            .map_err(|e| Error::data_load(&info.key, path, format!("row {line}: {e}")))?;
        let parsed = parse_row(&record, &cols)
            .map_err(|reason| Error::data_load(&info.key, path, format!("row {line}: {reason}")))?;
        let Some(row) = parsed else {
            log::debug!("`{}` row {line}: annual average row skipped", info.key);
            continue;
        };
        let mut obs = Observation::new(&info.key, &info.name, info.treatment_group, row.quarter, boundary)
            .with_measures(row.avg_monthly_employment, row.total_qtrly_wages, row.avg_wkly_wage);
        obs.area_fips = row.area_fips;
        obs.own_code = row.own_code;
        out.push(obs);
    }
    Ok(out)
}
