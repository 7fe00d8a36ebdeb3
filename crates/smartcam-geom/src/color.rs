//! 8-bit sRGB colors.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Black: #000000.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// White: #FFFFFF.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Pure blue: #0000FF.
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Pure green: #00FF00.
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    /// Pure red: #FF0000.
    pub const RED: Color = Color::rgb(255, 0, 0);

    /// Opaque color from its red, green, and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels normalized to `0.0..=1.0`, in RGBA order.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }

    /// `#RRGGBB` hex string (alpha omitted).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
