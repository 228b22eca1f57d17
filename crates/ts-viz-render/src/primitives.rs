//! Stroke, fill and text attributes understood by [`crate::canvas::Canvas`].

use crate::color::Color;

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    /// Continuous line.
    Solid,
    /// Long dashes (`6 3`), used for policy markers.
    Dashed,
    /// Short dashes (`3 3`), used for grid lines.
    Dotted,
}

impl Dash {
    /// `stroke-dasharray` value, `None` for solid strokes.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6 3"),
            Self::Dotted => Some("3 3"),
        }
    }
}

/// Stroke of a line or polyline.
#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: Dash,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Solid }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Dashed }
    }

    pub fn dotted(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Dotted }
    }
}

/// Fill and optional outline of a closed shape.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub color: Color,
    pub outline: Option<(Color, f64)>,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self { color, outline: None }
    }

    pub fn outlined(mut self, color: Color, width: f64) -> Self {
        self.outline = Some((color, width));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

/// Font size, weight, color and alignment of one text run.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// Regular black text, start-anchored on the alphabetic baseline.
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: Color::BLACK,
            weight: FontWeight::Regular,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn on(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Filled circular point marker; `radius` in points.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub radius: f64,
    pub color: Color,
}
