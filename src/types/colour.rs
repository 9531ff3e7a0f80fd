//! Canonical colour value and hex parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// An RGBA colour value, 8 bits per channel.
///
/// Serialises as lowercase `#rrggbb` when fully opaque and `#rrggbbaa`
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Why a hex string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexError {
    pub input: String,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid hex colour `{}` (use #rgb, #rgba, #rrggbb, or #rrggbbaa)",
            self.input
        )
    }
}

impl std::error::Error for HexError {}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RGBA` (4 digits, expanded to 8)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let err = || HexError {
            input: s.to_string(),
        };

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let digits: Vec<u8> = hex
            .bytes()
            .map(|b| (b as char).to_digit(16).unwrap_or(0) as u8)
            .collect();
        let pair = |i: usize| digits[i] << 4 | digits[i + 1];
        let double = |i: usize| digits[i] << 4 | digits[i];

        match digits.len() {
            3 => Ok(Self::rgb(double(0), double(1), double(2))),
            4 => Ok(Self::new(double(0), double(1), double(2), double(3))),
            6 => Ok(Self::rgb(pair(0), pair(2), pair(4))),
            8 => Ok(Self::new(pair(0), pair(2), pair(4), pair(6))),
            _ => Err(err()),
        }
    }

    /// Return the same colour with a different alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Red, green, and blue as floats in `0.0..=1.0`.
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build an opaque colour from unit floats, rounding each channel.
    pub fn from_unit_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }
}

/// Convert a unit float to a byte, rounding half away from zero.
pub(crate) fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Colour {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, HexError> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
