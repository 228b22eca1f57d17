//! Full pipeline driven by an analysis config.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use ts_core::Panel;
use ts_inference::{FittedModel, calculate_economic_effects_at, construct_treatment_variables};
use ts_viz::{summary_statistics, trends::employment_trends_artifact};
use ts_viz_render::config::VizConfig;

use crate::analysis_config::{AnalysisConfigV0, resolve_output};

const RESULTS_V0: &str = "tariffstat_results_v0";

/// Fit + effects JSON for one outcome.
pub fn model_json(model: &FittedModel, alpha: f64) -> Result<serde_json::Value> {
    let effects = if model.is_log_outcome() {
        serde_json::to_value(calculate_economic_effects_at(model, alpha)?)?
    } else {
        serde_json::Value::Null
    };
    let mut v = serde_json::to_value(model)?;
    if let Some(obj) = v.as_object_mut() {
        obj.insert("effects".into(), effects);
    }
    Ok(v)
}

/// Figure styling: defaults, overlaid by a YAML file, then by an explicit dpi.
pub fn viz_config(style: Option<&Path>, dpi: Option<u32>) -> Result<VizConfig> {
    let yaml = style
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("reading viz config {}", p.display())))
        .transpose()?;
    let mut viz = ts_viz_render::config::resolve_config(yaml.as_deref()).with_context(|| {
        format!("parsing viz config {}", style.map(|p| p.display().to_string()).unwrap_or_default())
    })?;
    if let Some(dpi) = dpi {
        viz.output.dpi = dpi;
    }
    if viz.output.dpi == 0 {
        anyhow::bail!("dpi must be positive");
    }
    Ok(viz)
}

fn fit_all(panel: &Panel, config: &AnalysisConfigV0) -> Result<Vec<serde_json::Value>> {
    let spec = config.specification();
    let mut models = Vec::with_capacity(config.outcomes.len());
    for &outcome in &config.outcomes {
        let model = ts_inference::run_did_regression_with(panel, outcome, &spec)
            .with_context(|| format!("regression for `{outcome}`"))?;
        tracing::info!(
            outcome = %outcome,
            n_obs = model.n_obs(),
            n_dropped = model.n_dropped(),
            r_squared = model.r_squared(),
            "model fitted"
        );
        models.push(model_json(&model, config.alpha)?);
    }
    Ok(models)
}

/// Paths written by [`run_analysis`].
#[derive(Debug, Default)]
pub struct RunOutputs {
    pub results_json: PathBuf,
    pub trends_json: PathBuf,
    pub plot: Option<PathBuf>,
    pub summary_csv: Option<PathBuf>,
    pub panel_csv: Option<PathBuf>,
}

pub fn run_analysis(config: &AnalysisConfigV0, out_dir: &Path) -> Result<RunOutputs> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    tracing::info!(data_dir = %config.data_dir.display(), "loading panel");
    let mapping = config.mapping()?;
    let (mut panel, report) = ts_data::load_panel(&config.data_dir, &mapping, &config.load_options())?;
    tracing::info!(rows = panel.len(), skipped = report.skipped.len(), "panel loaded");

    construct_treatment_variables(&mut panel)?;

    let mut outputs = RunOutputs::default();

    if let Some(p) = &config.panel_csv {
        let path = resolve_output(out_dir, p);
        ts_data::write_panel_csv(&panel, &path)?;
        outputs.panel_csv = Some(path);
    }

    let models = fit_all(&panel, config)?;

    let summary = summary_statistics(&panel);
    if let Some(p) = &config.summary_csv {
        let path = resolve_output(out_dir, p);
        summary.write_csv(&path)?;
        outputs.summary_csv = Some(path);
    }

    let trends = employment_trends_artifact(&panel, &config.policy_dates)?;
    outputs.trends_json = out_dir.join("trends.json");
    std::fs::write(&outputs.trends_json, serde_json::to_string_pretty(&trends)?)?;

    if let Some(p) = &config.plot.path {
        let path = resolve_output(out_dir, p);
        let viz = viz_config(config.plot.viz_config.as_deref(), config.plot.dpi)?;
        ts_viz_render::render_trends_to_file(&trends, &path, &viz)
            .with_context(|| format!("rendering {}", path.display()))?;
        tracing::info!(path = %path.display(), dpi = viz.output.dpi, "trend figure written");
        outputs.plot = Some(path);
    }

    let results = serde_json::json!({
        "schema_version": RESULTS_V0,
        "tool_version": ts_core::VERSION,
        "load_report": report,
        "specification": config.specification(),
        "alpha": config.alpha,
        "models": models,
        "summary": summary,
    });
    outputs.results_json = out_dir.join("results.json");
    std::fs::write(&outputs.results_json, serde_json::to_string_pretty(&results)?)?;
    tracing::info!(path = %outputs.results_json.display(), "results written");

    Ok(outputs)
}
