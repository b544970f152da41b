//! # Colors and palette
//!
//! Colors are plain RGB in the 0.0-1.0 range, the unit PDF's `rg`/`RG`
//! operators consume directly. In JSON they are written as hex strings
//! (`"#1F4E79"` or the short `"#abc"` form).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 0-255 channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#RRGGBB` or `#RGB`. Returns `None` for anything else.
    pub fn hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                (r, g, b)
            }
            _ => return None,
        };
        Some(Self::rgb8(r, g, b))
    }

    /// Mix toward white. `amount` 0.0 keeps the color, 1.0 yields white.
    pub fn tint(self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        Self {
            r: self.r + (1.0 - self.r) * t,
            g: self.g + (1.0 - self.g) * t,
            b: self.b + (1.0 - self.b) * t,
        }
    }

    pub fn to_hex(self) -> String {
        let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", ch(self.r), ch(self.g), ch(self.b))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::hex(&value).ok_or_else(|| format!("invalid hex color {value:?}"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Fixed presentation palette shared by every block renderer.
pub mod palette {
    use super::Color;

    pub const BRAND: Color = Color::rgb(0.1216, 0.3059, 0.4745); // #1F4E79
    pub const TEXT: Color = Color::rgb(0.1333, 0.1333, 0.1333); // #222222
    pub const MUTED: Color = Color::rgb(0.4667, 0.4667, 0.4667); // #777777
    pub const RULE: Color = Color::rgb(0.8000, 0.8000, 0.8000); // #CCCCCC
    pub const TRACK: Color = Color::rgb(0.9020, 0.9020, 0.9020); // #E6E6E6
    pub const ZEBRA: Color = Color::rgb(0.9608, 0.9686, 0.9804); // #F5F7FA
    pub const NEUTRAL: Color = Color::rgb(0.5412, 0.5608, 0.5961); // #8A8F98
    pub const SUCCESS: Color = Color::rgb(0.1804, 0.4902, 0.1961); // #2E7D32
    pub const WARNING: Color = Color::rgb(0.8784, 0.5569, 0.0431); // #E08E0B
    pub const DANGER: Color = Color::rgb(0.7765, 0.1569, 0.1569); // #C62828
    pub const INFO: Color = Color::rgb(0.0824, 0.3961, 0.7529); // #1565C0
    pub const WATERMARK: Color = Color::rgb(0.6196, 0.6196, 0.6196); // #9E9E9E
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::hex("000"), Some(Color::BLACK));
        assert_eq!(Color::hex("#1F4E79").map(Color::to_hex), Some(palette::BRAND.to_hex()));
    }

    #[test]
    fn rejects_garbage_hex() {
        assert_eq!(Color::hex("#12345"), None);
        assert_eq!(Color::hex("zzzzzz"), None);
        assert_eq!(Color::hex("#ééé"), None);
    }

    #[test]
    fn tint_moves_toward_white() {
        let t = Color::BLACK.tint(0.5);
        assert!((t.r - 0.5).abs() < 1e-9);
        assert_eq!(palette::DANGER.tint(1.0).to_hex(), "#FFFFFF");
        assert_eq!(palette::DANGER.tint(0.0), palette::DANGER);
    }

    #[test]
    fn hex_round_trips_through_serde() {
        let json = serde_json::to_string(&palette::BRAND).unwrap();
        assert_eq!(json, "\"#1F4E79\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), palette::BRAND.to_hex());
    }
}
