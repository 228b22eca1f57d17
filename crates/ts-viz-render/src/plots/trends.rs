use ts_core::PolicyDates;
use ts_viz::trends::TrendsArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::axes::{Axis, year_fraction};
use crate::layout::legend::{LegendEntry, LegendKind, draw_legend};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::{Marker, Stroke};

/// Line chart of mean employment per industry with dashed policy markers.
pub fn render(artifact: &TrendsArtifact, config: &VizConfig) -> crate::Result<String> {
    let mut canvas = Canvas::new(config.figure.width, config.figure.height);

    // X range covers every point and every marker.
    let dates = artifact
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .chain(artifact.markers.iter().map(|m| m.date));
    let (first, last) = dates
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((d.min(lo), d.max(hi))),
        })
        .unwrap_or_else(|| {
            let fallback = PolicyDates::default();
            (fallback.tariff_implemented, fallback.administration_change)
        });
    let x_axis = Axis::years(first, last).with_label(&artifact.x_label);

    let values = artifact.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let (y_min, y_max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (y_min, y_max) = if y_min.is_finite() { (y_min, y_max) } else { (0.0, 1.0) };
    let pad = (y_max - y_min).abs() * 0.05;
    let y_axis =
        Axis::auto_linear(y_min - pad, y_max + pad, config.axes.target_y_ticks).with_label(&artifact.y_label);

    let area = PlotArea::auto(&canvas, &y_axis, &x_axis, !artifact.title.is_empty(), config);
    draw_title(&mut canvas, &area, &artifact.title, config);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let palette = config.palette_colors();
    let mut legend = Vec::with_capacity(artifact.series.len() + artifact.markers.len());

    canvas.push_clip(area.left, area.top, area.width, area.height);

    for (i, series) in artifact.series.iter().enumerate() {
        let color = palette.get(i % palette.len().max(1)).copied().unwrap_or_default();
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|p| {
                let px = x_axis.data_to_pixel(year_fraction(p.date), area.left, area.right());
                let py = y_axis.data_to_pixel(p.value, area.bottom(), area.top);
                (px, py)
            })
            .collect();

        canvas.polyline(&points, Stroke::solid(color, config.trends.line_width));
        let marker = Marker { radius: config.trends.marker_size, color };
        for &(px, py) in &points {
            canvas.marker(px, py, marker);
        }
        legend.push(LegendEntry { label: series.industry_name.clone(), color, kind: LegendKind::LineMarker });
    }

    for m in &artifact.markers {
        let color = Color::hex(&m.color).with_alpha(config.trends.marker_alpha);
        let px = x_axis.data_to_pixel(year_fraction(m.date), area.left, area.right());
        canvas.line(px, area.top, px, area.bottom(), Stroke::dashed(color, config.trends.marker_line_width));
        legend.push(LegendEntry { label: m.label.clone(), color, kind: LegendKind::DashedLine });
    }

    canvas.pop_clip();

    draw_legend(&mut canvas, &area, &legend, config.font.legend_size);

    Ok(canvas.finish_svg())
}
