//! Analysis config v0 (YAML) parsing + semantic validation.
//!
//! A single YAML file drives load → indicators → regressions → report.
//! Relative input paths (`data_dir`, `plot.viz_config`) resolve against the
//! config file's directory; relative output paths resolve against the run's
//! output directory.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use ts_core::{Outcome, PolicyDates};
use ts_data::{IndustryInfo, IndustryMapping, LoadOptions, MissingIndustryPolicy};
use ts_inference::DidSpecification;

pub const CONFIG_V0: &str = "tariffstat_analysis_v0";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfigV0 {
    pub schema_version: String,
    pub data_dir: PathBuf,
    /// Empty means the three-industry steel-tariff study.
    #[serde(default)]
    pub industries: Vec<IndustryInfo>,
    #[serde(default)]
    pub missing_industry: MissingIndustryPolicy,
    #[serde(default)]
    pub policy_dates: PolicyDates,
    #[serde(default = "default_outcomes")]
    pub outcomes: Vec<Outcome>,
    #[serde(default = "default_true")]
    pub include_interaction: bool,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub summary_csv: Option<PathBuf>,
    #[serde(default)]
    pub panel_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PlotConfig {
    /// `None` disables the figure.
    pub path: Option<PathBuf>,
    /// Overrides `output.dpi` of the viz config.
    pub dpi: Option<u32>,
    /// Figure styling YAML (see `ts_viz_render::config::VizConfig`).
    pub viz_config: Option<PathBuf>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { path: Some(PathBuf::from("employment_trends.png")), dpi: None, viz_config: None }
    }
}

fn default_outcomes() -> Vec<Outcome> {
    vec![Outcome::LogAvgMonthlyEmployment]
}

fn default_true() -> bool {
    true
}

fn default_alpha() -> f64 {
    ts_inference::econometrics::effects::DEFAULT_ALPHA
}

impl AnalysisConfigV0 {
    pub fn mapping(&self) -> Result<IndustryMapping> {
        if self.industries.is_empty() {
            return Ok(IndustryMapping::steel_tariff_default());
        }
        Ok(IndustryMapping::from_entries(self.industries.iter().cloned())?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions { missing_industry: self.missing_industry, era_boundary: self.policy_dates.era_boundary() }
    }

    pub fn specification(&self) -> DidSpecification {
        if self.include_interaction { DidSpecification::default() } else { DidSpecification::without_interaction() }
    }

    fn validate(&self) -> Result<()> {
        if self.schema_version != CONFIG_V0 {
            bail!("unsupported schema_version `{}` (expected `{CONFIG_V0}`)", self.schema_version);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            bail!("alpha must be in (0, 1), got {}", self.alpha);
        }
        if self.outcomes.is_empty() {
            bail!("outcomes must list at least one outcome column");
        }
        if self.plot.dpi == Some(0) {
            bail!("plot.dpi must be positive");
        }
        Ok(())
    }
}

pub fn read_analysis_config(path: &Path) -> Result<AnalysisConfigV0> {
    let bytes = std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let mut config: AnalysisConfigV0 =
        serde_yaml_ng::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate().with_context(|| format!("invalid config {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    if config.data_dir.is_relative() {
        config.data_dir = base.join(&config.data_dir);
    }
    if let Some(style) = config.plot.viz_config.as_mut().filter(|p| p.is_relative()) {
        *style = base.join(&*style);
    }
    Ok(config)
}

/// `path` under `out_dir` unless absolute.
pub fn resolve_output(out_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { out_dir.join(path) }
}
