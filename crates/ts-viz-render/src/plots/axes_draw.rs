use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Gap between a tick end and its label.
const TICK_LABEL_GAP: f64 = 3.0;

/// Frame, grid, ticks, tick labels and axis titles around `area`.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &VizConfig) {
    let tick_len = config.axes.tick_length;
    let outward = config.axes.tick_direction != "in";
    let reach = if outward { tick_len } else { 0.0 };
    let tick = Stroke::solid(Color::BLACK, 0.6);
    let grid = Stroke::dotted(config.grid.color.with_alpha(config.grid.alpha), 0.6);

    let (l, r, t, b) = (area.left, area.right(), area.top, area.bottom());
    let frame = Stroke::solid(Color::BLACK, 0.8);
    for (x1, y1, x2, y2) in [(l, t, r, t), (l, b, r, b), (l, t, l, b), (r, t, r, b)] {
        canvas.line(x1, y1, x2, y2, frame);
    }

    let x_labels = TextStyle::new(config.font.tick_size).anchored(TextAnchor::Middle).on(TextBaseline::Hanging);
    for (value, label) in x_axis.ticks() {
        let px = x_axis.data_to_pixel(value, l, r);
        if !(l - 0.5..=r + 0.5).contains(&px) {
            continue;
        }
        if config.grid.show {
            canvas.line(px, t, px, b, grid);
        }
        let end = if outward { b + tick_len } else { b - tick_len };
        canvas.line(px, b, px, end, tick);
        canvas.text(px, b + reach + TICK_LABEL_GAP, label, x_labels);
    }

    let y_labels = TextStyle::new(config.font.tick_size).anchored(TextAnchor::End).on(TextBaseline::Central);
    let mut widest = 0.0_f64;
    for (value, label) in y_axis.ticks() {
        let py = y_axis.data_to_pixel(value, b, t);
        if !(t - 0.5..=b + 0.5).contains(&py) {
            continue;
        }
        if config.grid.show {
            canvas.line(l, py, r, py, grid);
        }
        let end = if outward { l - tick_len } else { l + tick_len };
        canvas.line(l, py, end, py, tick);
        widest = widest.max(canvas.measure_text(label, &y_labels).width);
        canvas.text(l - reach - TICK_LABEL_GAP - 1.0, py, label, y_labels);
    }

    let title = TextStyle::new(config.font.label_size).anchored(TextAnchor::Middle);
    if !x_axis.label.is_empty() {
        let y = b + reach + config.font.tick_size + 8.0 + config.font.label_size;
        canvas.text(l + area.width / 2.0, y, &x_axis.label, title);
    }
    if !y_axis.label.is_empty() {
        let x = l - reach - TICK_LABEL_GAP - 1.0 - widest - 8.0;
        canvas.text_rotated(x, t + area.height / 2.0, &y_axis.label, title, -90.0);
    }
}
