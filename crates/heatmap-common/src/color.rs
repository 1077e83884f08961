//! ARGB color values and parsing.

use crate::error::{HeatmapError, HeatmapResult};
use serde::{Deserialize, Serialize};

/// Non-premultiplied 8-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Argb {
    pub const TRANSPARENT: Argb = Argb::new(0, 0, 0, 0);
    pub const BLACK: Argb = Argb::new(255, 0, 0, 0);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    /// Unpack from `0xAARRGGBB`.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Same RGB with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation in ARGB space. `t` is clamped to [0, 1].
    pub fn lerp(self, other: Argb, t: f64) -> Argb {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 = |a: u8, b: u8| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };

        Argb {
            a: lerp_u8(self.a, other.a),
            r: lerp_u8(self.r, other.r),
            g: lerp_u8(self.g, other.g),
            b: lerp_u8(self.b, other.b),
        }
    }

    /// Parse `#RRGGBB`, `#AARRGGBB` or a color name.
    ///
    /// The eight-digit form puts alpha first, matching the packed `0xAARRGGBB`
    /// layout used everywhere else in the crate.
    pub fn parse(s: &str) -> HeatmapResult<Self> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| HeatmapError::InvalidColor(s.to_string()));
        }
        named_color(trimmed).ok_or_else(|| HeatmapError::InvalidColor(s.to_string()))
    }
}

impl From<u32> for Argb {
    fn from(packed: u32) -> Self {
        Argb::from_u32(packed)
    }
}

fn parse_hex(hex: &str) -> Option<Argb> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        6 => Some(Argb::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Argb::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Argb> {
    let color = match name.to_lowercase().as_str() {
        "transparent" => Argb::TRANSPARENT,
        "black" => Argb::BLACK,
        "white" => Argb::rgb(255, 255, 255),
        "red" => Argb::rgb(255, 0, 0),
        "green" => Argb::rgb(0, 255, 0),
        "blue" => Argb::rgb(0, 0, 255),
        "yellow" => Argb::rgb(255, 255, 0),
        "cyan" => Argb::rgb(0, 255, 255),
        "magenta" => Argb::rgb(255, 0, 255),
        "orange" => Argb::rgb(255, 165, 0),
        "purple" => Argb::rgb(128, 0, 128),
        "gray" | "grey" => Argb::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let c = Argb::from_u32(0x80FF5500);
        assert_eq!(c, Argb::new(0x80, 0xFF, 0x55, 0x00));
        assert_eq!(c.to_u32(), 0x80FF5500);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Argb::parse("#FF5500").unwrap(), Argb::rgb(255, 85, 0));
        assert_eq!(Argb::parse("#00FF5500").unwrap(), Argb::new(0, 255, 85, 0));
        assert!(Argb::parse("#GGGGGG").is_err());
        assert!(Argb::parse("#FFF").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Argb::parse("Red").unwrap(), Argb::rgb(255, 0, 0));
        assert_eq!(Argb::parse("transparent").unwrap(), Argb::TRANSPARENT);
        assert!(Argb::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn test_lerp_endpoints_and_mid() {
        let a = Argb::new(0, 0, 0, 0);
        let b = Argb::new(255, 255, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Argb::new(128, 128, 50, 0));
        // Out of range t is clamped
        assert_eq!(a.lerp(b, 2.0), b);
    }
}
