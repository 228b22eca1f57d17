use serde::Deserialize;
use std::fmt;

/// sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` (leading `#` optional); malformed channels read as 0.
    pub fn hex(s: &str) -> Self {
        let digits = s.trim().trim_start_matches('#');
        let mut rgb = [0u8; 3];
        for (k, c) in rgb.iter_mut().enumerate() {
            *c = digits.get(2 * k..2 * k + 2).and_then(|h| u8::from_str_radix(h, 16).ok()).unwrap_or(0);
        }
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    fn is_opaque(&self) -> bool {
        (self.a - 1.0).abs() < 1e-6
    }
}

/// SVG paint: `#rrggbb` when opaque, `rgba(...)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Color::hex(&s))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// matplotlib's default color cycle.
pub const TAB10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Color-blind safe alternative.
pub const OKABE_ITO: &[&str] =
    &["#0072b2", "#d55e00", "#56b4e9", "#e69f00", "#f0e442", "#009e73", "#cc79a7"];

/// Series colors for a palette name; unknown names fall back to `tab10`.
pub fn palette_colors(name: &str) -> Vec<Color> {
    let hexes = if name.eq_ignore_ascii_case("okabe_ito") { OKABE_ITO } else { TAB10 };
    hexes.iter().map(|h| Color::hex(h)).collect()
}
