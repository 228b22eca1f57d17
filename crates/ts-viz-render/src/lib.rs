//! # ts-viz-render
//!
//! Draws `ts-viz` artifacts onto an SVG canvas and, with the `png` feature,
//! rasterises them through resvg.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use std::path::Path;

use config::VizConfig;
use thiserror::Error;
use ts_viz::trends::TrendsArtifact;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render the employment trend figure to an SVG string.
pub fn render_trends_svg(artifact: &TrendsArtifact, config: &VizConfig) -> Result<String> {
    plots::trends::render(artifact, config)
}

/// Render the employment trend figure and write it to `path`.
///
/// `.svg` writes the vector figure and `.png` rasterises at
/// `config.output.dpi`; other extensions are rejected.
pub fn render_trends_to_file(artifact: &TrendsArtifact, path: &Path, config: &VizConfig) -> Result<()> {
    let svg = render_trends_svg(artifact, config)?;
    write_svg_as(&svg, path, config)
}

/// Render an artifact JSON to SVG string.
pub fn render_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let svg = match kind {
        "trends" => {
            let art: TrendsArtifact = serde_json::from_str(artifact_json)?;
            plots::trends::render(&art, config)?
        }
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    Ok(svg)
}

/// Render an artifact JSON to a file (format inferred from extension).
pub fn render_to_file(artifact_json: &str, kind: &str, path: &Path, config: &VizConfig) -> Result<()> {
    let svg = render_svg(artifact_json, kind, config)?;
    write_svg_as(&svg, path, config)
}

fn write_svg_as(svg: &str, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("svg") => output::svg::save_svg(svg, path),
        #[cfg(feature = "png")]
        Some("png") => {
            let bytes = output::png::svg_to_png(svg, config.output.dpi)?;
            std::fs::write(path, bytes)?;
            log::debug!("wrote PNG at {} dpi to {}", config.output.dpi, path.display());
            Ok(())
        }
        _ => {
            let _ = config;
            Err(RenderError::UnknownFormat(format!("{} (expected .svg or .png)", path.display())))
        }
    }
}
