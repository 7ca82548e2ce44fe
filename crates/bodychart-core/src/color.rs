//! Ink colours and the fixed palette/brush sets offered by the toolbar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The ink colours offered by the body chart toolbar.
pub const DEFAULT_PALETTE: [InkColor; 4] = [
    InkColor::rgb(0x00, 0x00, 0x00),
    InkColor::rgb(0x66, 0x66, 0x66),
    InkColor::rgb(0x8B, 0x45, 0x13),
    InkColor::rgb(0x00, 0xBC, 0xD4),
];

/// Brush widths offered by the toolbar, in native canvas pixels.
pub const DEFAULT_BRUSH_WIDTHS: [f32; 3] = [2.0, 5.0, 10.0];

/// Brush width selected when a surface is created.
pub const DEFAULT_BRUSH_WIDTH: f32 = 5.0;

/// Colour parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid hex color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidLength(String),
    #[error("Invalid hex digit in color '{0}'")]
    InvalidDigit(String),
}

/// An RGBA8 ink colour.
///
/// Serialized as a CSS-style hex string (`#rrggbb`, or `#rrggbbaa` when not
/// fully opaque) so configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl InkColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(ColorError::InvalidDigit(input.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidDigit(input.to_string()))
        };

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => Err(ColorError::InvalidLength(input.to_string())),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when the colour is translucent.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Whether the colour is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl Default for InkColor {
    fn default() -> Self {
        Self::black()
    }
}

impl std::fmt::Display for InkColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for InkColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<InkColor> for String {
    fn from(color: InkColor) -> Self {
        color.to_hex()
    }
}

impl From<InkColor> for tiny_skia::Color {
    fn from(color: InkColor) -> Self {
        tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}
