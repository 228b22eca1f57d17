use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::{TextAnchor, TextStyle};

/// Bold figure title centered over the plot area.
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, config: &VizConfig) {
    if !title.is_empty() {
        let style = TextStyle::new(config.font.title_size).bold().anchored(TextAnchor::Middle);
        canvas.text(area.left + area.width / 2.0, area.top - 12.0, title, style);
    }
}
