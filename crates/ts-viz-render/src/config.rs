use serde::Deserialize;

use crate::color::Color;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub palette: String,
    pub trends: TrendsConfig,
    pub output: OutputConfig,
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 864.0,  // 12" * 72
            height: 576.0, // 8" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { title_size: 16.0, label_size: 12.0, tick_size: 10.0, legend_size: 10.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub tick_length: f64,
    pub target_y_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self { tick_direction: "out".into(), tick_length: 4.0, target_y_ticks: 6 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#b0b0b0"), alpha: 0.3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    pub line_width: f64,
    pub marker_size: f64,
    pub marker_line_width: f64,
    pub marker_alpha: f64,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self { line_width: 2.0, marker_size: 2.0, marker_line_width: 1.2, marker_alpha: 0.7 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 300 }
    }
}

/// Resolve a VizConfig from an optional YAML string; absent keys keep their defaults.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) => {
            let config: VizConfig = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            Ok(config)
        }
    }
}
