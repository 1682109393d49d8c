//! RGB colors and the green-highlight heuristic.

/// Minimum green channel for a color to read as highlighter green.
pub const GREEN_FLOOR: f64 = 0.6;

/// Margin by which green must exceed both red and blue.
pub const GREEN_MARGIN: f64 = 0.10;

/// An RGB color with components in `[0, 1]`.
///
/// Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[f64; 3]", from = "[f64; 3]")
)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Decode a packed `0xRRGGBB` integer.
    ///
    /// Returns `None` for values outside `0..=0xFFFFFF`.
    pub fn from_srgb_int(value: i64) -> Option<Self> {
        if !(0..=0xFF_FFFF).contains(&value) {
            return None;
        }
        let channel = |shift: i64| ((value >> shift) & 0xFF) as f64 / 255.0;
        Some(Self::new(channel(16), channel(8), channel(0)))
    }

    /// Pack into a `0xRRGGBB` integer, rounding each channel.
    pub fn to_srgb_int(&self) -> u32 {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Convert a PDF color array (gray, RGB or CMYK) to RGB.
    ///
    /// Any other component count, or a non-finite component, yields `None`.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        if !components.iter().all(|c| c.is_finite()) {
            return None;
        }
        let c = |v: f64| v.clamp(0.0, 1.0);
        match *components {
            [g] => Some(Self::new(c(g), c(g), c(g))),
            [r, g, b] => Some(Self::new(c(r), c(g), c(b))),
            [cy, m, y, k] => Some(Self::new(
                1.0 - (cy + k).min(1.0),
                1.0 - (m + k).min(1.0),
                1.0 - (y + k).min(1.0),
            )),
            _ => None,
        }
    }

    /// Whether this color reads as a green highlighter.
    ///
    /// Fixed heuristic, not a calibrated classifier: green must reach
    /// [`GREEN_FLOOR`] and beat red and blue by [`GREEN_MARGIN`].
    pub fn is_green(&self) -> bool {
        self.g >= GREEN_FLOOR && self.g >= self.r + GREEN_MARGIN && self.g >= self.b + GREEN_MARGIN
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<[f64; 3]> for Rgb {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self { r, g, b }
    }
}

/// [`Rgb::is_green`] over an optional color; absent is never green.
pub fn is_green(color: Option<&Rgb>) -> bool {
    color.is_some_and(Rgb::is_green)
}
