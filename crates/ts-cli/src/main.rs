//! tariffstat CLI

mod analysis_config;
mod run;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ts_core::{Outcome, Panel, PolicyDates};
use ts_data::{IndustryMapping, LoadOptions, MissingIndustryPolicy};
use ts_inference::{DidSpecification, construct_treatment_variables, run_did_regression_with};
use ts_viz_render::config::VizConfig;

#[derive(Parser)]
#[command(name = "tariffstat")]
#[command(about = "tariffstat - difference-in-differences analysis of steel-tariff employment effects")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a YAML analysis config
    Run {
        /// Analysis config (schema_version: tariffstat_analysis_v0)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory for results.json, trends.json and relative output paths
        #[arg(long, default_value = "tariffstat_out")]
        out_dir: PathBuf,
    },

    /// Fit the DiD regression for one outcome
    Fit {
        /// Directory holding one QCEW CSV per industry
        #[arg(long)]
        data_dir: PathBuf,

        /// Outcome column (e.g. log_avg_monthly_employment)
        #[arg(long, default_value = "log_avg_monthly_employment")]
        outcome: String,

        /// Fit main effects only (no treated_biden term)
        #[arg(long)]
        no_interaction: bool,

        /// Significance level for the effect flags
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Abort when an industry file is missing or malformed
        #[arg(long)]
        fail_on_missing: bool,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Descriptive statistics by industry and policy era
    Summary {
        /// Directory holding one QCEW CSV per industry
        #[arg(long)]
        data_dir: PathBuf,

        /// Also write the table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write the table as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Employment trend figure (.svg or .png)
    Plot {
        /// Directory holding one QCEW CSV per industry
        #[arg(long)]
        data_dir: PathBuf,

        /// Output figure; the extension selects the format
        #[arg(short, long)]
        output: PathBuf,

        /// Raster resolution for .png output [default: 300, or the viz config's]
        #[arg(long)]
        dpi: Option<u32>,

        /// Figure styling YAML (figure size, fonts, grid, palette, ...)
        #[arg(long)]
        viz_config: Option<PathBuf>,

        /// Also write the trend artifact JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Render a saved trend artifact JSON
    Render {
        /// Trend artifact (tariffstat_trends_v0)
        #[arg(short, long)]
        input: PathBuf,

        /// Output figure; the extension selects the format
        #[arg(short, long)]
        output: PathBuf,

        /// Raster resolution for .png output [default: 300, or the viz config's]
        #[arg(long)]
        dpi: Option<u32>,

        /// Figure styling YAML (figure size, fonts, grid, palette, ...)
        #[arg(long)]
        viz_config: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON and tables; logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config, out_dir } => cmd_run(&config, &out_dir),
        Commands::Fit { data_dir, outcome, no_interaction, alpha, fail_on_missing, output } => {
            cmd_fit(&data_dir, &outcome, no_interaction, alpha, fail_on_missing, output.as_ref())
        }
        Commands::Summary { data_dir, csv, json } => cmd_summary(&data_dir, csv.as_deref(), json.as_deref()),
        Commands::Plot { data_dir, output, dpi, viz_config, json } => {
            let viz = run::viz_config(viz_config.as_deref(), dpi)?;
            cmd_plot(&data_dir, &output, &viz, json.as_deref())
        }
        Commands::Render { input, output, dpi, viz_config } => {
            let viz = run::viz_config(viz_config.as_deref(), dpi)?;
            cmd_render(&input, &output, &viz)
        }
        Commands::Version => {
            println!("tariffstat {}", ts_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_run(config_path: &Path, out_dir: &Path) -> Result<()> {
    let config = analysis_config::read_analysis_config(config_path)?;
    let outputs = run::run_analysis(&config, out_dir)?;
    println!("{}", outputs.results_json.display());
    Ok(())
}

/// Load the steel-tariff study panel with default policy dates.
fn load_study_panel(data_dir: &Path, fail_on_missing: bool) -> Result<Panel> {
    let options = LoadOptions {
        missing_industry: if fail_on_missing { MissingIndustryPolicy::Fail } else { MissingIndustryPolicy::Skip },
        era_boundary: PolicyDates::default().era_boundary(),
    };
    tracing::info!(path = %data_dir.display(), "loading panel");
    let (panel, report) = ts_data::load_panel(data_dir, &IndustryMapping::steel_tariff_default(), &options)?;
    for s in &report.skipped {
        tracing::warn!(industry = %s.key, reason = %s.reason, "industry skipped");
    }
    tracing::info!(rows = panel.len(), industries = report.loaded.len(), "panel loaded");
    Ok(panel)
}

fn cmd_fit(
    data_dir: &Path,
    outcome: &str,
    no_interaction: bool,
    alpha: f64,
    fail_on_missing: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let outcome: Outcome = outcome.parse()?;
    let mut panel = load_study_panel(data_dir, fail_on_missing)?;
    construct_treatment_variables(&mut panel)?;

    let spec = if no_interaction { DidSpecification::without_interaction() } else { DidSpecification::default() };
    let model = run_did_regression_with(&panel, outcome, &spec)?;
    tracing::info!(outcome = %outcome, n_obs = model.n_obs(), n_dropped = model.n_dropped(), "fit complete");

    write_json(output, run::model_json(&model, alpha)?)
}

fn cmd_summary(data_dir: &Path, csv: Option<&Path>, json: Option<&Path>) -> Result<()> {
    let panel = load_study_panel(data_dir, false)?;
    let table = ts_viz::summary_statistics(&panel);
    print!("{table}");
    if let Some(path) = csv {
        table.write_csv(path)?;
    }
    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&table)?)?;
    }
    Ok(())
}

fn cmd_plot(data_dir: &Path, output: &Path, viz: &VizConfig, json: Option<&Path>) -> Result<()> {
    let panel = load_study_panel(data_dir, false)?;
    let artifact = ts_viz::employment_trends_artifact(&panel, &PolicyDates::default())?;
    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&artifact)?)?;
    }
    ts_viz_render::render_trends_to_file(&artifact, output, viz)
        .with_context(|| format!("rendering {}", output.display()))?;
    tracing::info!(path = %output.display(), series = artifact.series.len(), "trend figure written");
    Ok(())
}

fn cmd_render(input: &Path, output: &Path, viz: &VizConfig) -> Result<()> {
    let json = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    ts_viz_render::render_to_file(&json, "trends", output, viz)
        .with_context(|| format!("rendering {}", output.display()))?;
    Ok(())
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
