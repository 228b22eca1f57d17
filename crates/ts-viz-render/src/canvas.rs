//! Retained SVG canvas.
//!
//! Drawing calls append nodes; [`Canvas::finish_svg`] serialises them in
//! order on a white background. Coordinates are points (1/72 inch), so the
//! figure size in the config maps 1:1 onto the SVG viewBox.

use std::fmt::Write as _;

use crate::primitives::*;
use crate::text::{TextMetrics, measure_text};

const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";

#[derive(Debug, Clone)]
enum Node {
    Rect { x: f64, y: f64, w: f64, h: f64, fill: Fill },
    Line { from: (f64, f64), to: (f64, f64), stroke: Stroke },
    Polyline { points: Vec<(f64, f64)>, stroke: Stroke },
    Circle { center: (f64, f64), r: f64, color: crate::color::Color },
    Text { at: (f64, f64), content: String, style: TextStyle, rotate: Option<f64> },
    Clipped { clip_id: String, children: Vec<Node> },
}

pub struct Canvas {
    pub width: f64,
    pub height: f64,
    nodes: Vec<Node>,
    clip_defs: Vec<String>,
    /// Open clip regions: id and the index of the first node drawn inside.
    open_clips: Vec<(String, usize)>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, nodes: Vec::new(), clip_defs: Vec::new(), open_clips: Vec::new() }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Fill) {
        self.nodes.push(Node::Rect { x, y, w, h, fill });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.nodes.push(Node::Line { from: (x1, y1), to: (x2, y2), stroke });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke) {
        if points.is_empty() {
            return;
        }
        self.nodes.push(Node::Polyline { points: points.to_vec(), stroke });
    }

    pub fn marker(&mut self, x: f64, y: f64, marker: Marker) {
        self.nodes.push(Node::Circle { center: (x, y), r: marker.radius, color: marker.color });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle) {
        self.nodes.push(Node::Text { at: (x, y), content: content.to_string(), style, rotate: None });
    }

    /// Text rotated by `angle` degrees about its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: TextStyle, angle: f64) {
        self.nodes.push(Node::Text { at: (x, y), content: content.to_string(), style, rotate: Some(angle) });
    }

    /// Open a rectangular clip; nodes drawn until [`Canvas::pop_clip`] are clipped to it.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.clip_defs.len());
        self.clip_defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.open_clips.push((id.clone(), self.nodes.len()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, start)) = self.open_clips.pop() {
            let children = self.nodes.split_off(start);
            self.nodes.push(Node::Clipped { clip_id, children });
        }
    }

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_text(content, style)
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        let (w, h) = (self.width, self.height);
        let _ = writeln!(out, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#);
        if !self.clip_defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.clip_defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }
        let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="white" />"#);
        for node in &self.nodes {
            node.write_svg(&mut out);
        }
        out.push_str("</svg>\n");
        out
    }
}

// Writes into a String are infallible; `write!` results are discarded.
impl Node {
    fn write_svg(&self, out: &mut String) {
        match self {
            Node::Rect { x, y, w, h, fill } => {
                let _ = write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{}""#, fill.color);
                if let Some((color, width)) = fill.outline {
                    let _ = write!(out, r#" stroke="{color}" stroke-width="{width:.2}""#);
                }
                out.push_str(" />\n");
            }
            Node::Line { from, to, stroke } => {
                let _ = write!(out, r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}""#, from.0, from.1, to.0, to.1);
                write_stroke(out, stroke);
                out.push_str(" />\n");
            }
            Node::Polyline { points, stroke } => {
                let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
                let _ = write!(out, r#"<polyline points="{}" fill="none""#, coords.join(" "));
                write_stroke(out, stroke);
                out.push_str(" stroke-linejoin=\"round\" />\n");
            }
            Node::Circle { center, r, color } => {
                let _ = writeln!(out, r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" fill="{color}" />"#, center.0, center.1);
            }
            Node::Text { at, content, style, rotate } => {
                let (x, y) = *at;
                let _ = write!(
                    out,
                    r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{:.1}" fill="{}" text-anchor="{}" dominant-baseline="{}""#,
                    style.size,
                    style.color,
                    anchor_attr(style.anchor),
                    baseline_attr(style.baseline),
                );
                if style.weight == FontWeight::Bold {
                    out.push_str(r#" font-weight="bold""#);
                }
                if let Some(angle) = rotate {
                    let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
                }
                let _ = writeln!(out, ">{}</text>", escape(content));
            }
            Node::Clipped { clip_id, children } => {
                let _ = writeln!(out, r#"<g clip-path="url(#{clip_id})">"#);
                for child in children {
                    child.write_svg(out);
                }
                out.push_str("</g>\n");
            }
        }
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(out, r#" stroke="{}" stroke-width="{:.2}""#, stroke.color, stroke.width);
    if let Some(pattern) = stroke.dash.dasharray() {
        let _ = write!(out, r#" stroke-dasharray="{pattern}""#);
    }
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn baseline_attr(baseline: TextBaseline) -> &'static str {
    match baseline {
        TextBaseline::Alphabetic => "auto",
        TextBaseline::Central => "central",
        TextBaseline::Hanging => "hanging",
    }
}

fn escape(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            c => s.push(c),
        }
    }
    s
}
