use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Average advance of a sans-serif glyph, as a fraction of the font size.
const REGULAR_ADVANCE: f64 = 0.55;
const BOLD_ADVANCE: f64 = 0.6;

/// Approximate text extent in points.
///
/// No font is embedded in the SVG, so layout uses a width estimate for a
/// generic sans-serif face rather than real glyph advances.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let advance = match style.weight {
        FontWeight::Regular => REGULAR_ADVANCE,
        FontWeight::Bold => BOLD_ADVANCE,
    };
    let chars = text.chars().count() as f64;
    TextMetrics { width: chars * style.size * advance, height: style.size * 1.2, ascent: style.size * 0.8 }
}
