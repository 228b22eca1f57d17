use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Outer padding on every side of the figure.
const EDGE: f64 = 15.0;
/// Smallest plot area kept on tiny figures.
const MIN_SIDE: f64 = 50.0;

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Area left over after reserving room for the title, tick labels and axis labels.
    pub fn auto(canvas: &Canvas, y_axis: &Axis, x_axis: &Axis, has_title: bool, config: &VizConfig) -> Self {
        let tick_style = TextStyle::new(config.font.tick_size);
        let axis_title = |axis: &Axis| if axis.label.is_empty() { 0.0 } else { config.font.label_size + 8.0 };

        let y_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let left = EDGE + y_tick_w + config.axes.tick_length + 6.0 + axis_title(y_axis);
        let bottom = EDGE + config.axes.tick_length + config.font.tick_size + 6.0 + axis_title(x_axis);
        let top = if has_title { config.font.title_size * 1.2 + 22.0 } else { EDGE };
        let right = EDGE + 5.0;

        Self {
            left,
            top,
            width: (canvas.width - left - right).max(MIN_SIDE),
            height: (canvas.height - top - bottom).max(MIN_SIDE),
        }
    }
}
