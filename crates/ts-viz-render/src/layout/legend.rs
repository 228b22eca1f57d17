use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    /// Industry series: solid line with a point marker.
    LineMarker,
    /// Policy date: dashed line.
    DashedLine,
}

const PADDING: f64 = 6.0;
const SWATCH: f64 = 20.0;
const GAP: f64 = 6.0;
/// Offset of the legend box from the plot corner.
const INSET: f64 = 8.0;

/// Boxed legend in the top-left corner of the plot area, one row per entry.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let style = TextStyle::new(font_size).on(TextBaseline::Central);
    let row = font_size + 5.0;
    let text_w = entries.iter().map(|e| canvas.measure_text(&e.label, &style).width).fold(0.0_f64, f64::max);

    let (x0, y0) = (area.left + INSET, area.top + INSET);
    let frame = Fill::solid(Color::WHITE.with_alpha(0.85)).outlined(Color::rgb(200, 200, 200), 0.5);
    canvas.rect(x0, y0, 2.0 * PADDING + SWATCH + GAP + text_w, 2.0 * PADDING + row * entries.len() as f64, frame);

    for (i, entry) in entries.iter().enumerate() {
        let y = y0 + PADDING + row * (i as f64 + 0.5);
        let x = x0 + PADDING;
        match entry.kind {
            LegendKind::LineMarker => {
                canvas.line(x, y, x + SWATCH, y, Stroke::solid(entry.color, 1.5));
                canvas.marker(x + SWATCH / 2.0, y, Marker { radius: 2.5, color: entry.color });
            }
            LegendKind::DashedLine => canvas.line(x, y, x + SWATCH, y, Stroke::dashed(entry.color, 1.2)),
        }
        canvas.text(x + SWATCH + GAP, y, &entry.label, style);
    }
}
