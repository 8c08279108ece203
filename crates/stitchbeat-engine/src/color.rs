//! Colors and per-motion styling.
//!
//! Colors travel as `#rrggbb` strings in clip documents and config files and
//! as packed u8 triples everywhere else. A [`MotionStyle`] is all the renderer
//! needs to paint one motion: a flat body color plus an ordered accent ramp
//! indexed from the canvas center outward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::MOTION_COUNT;
use crate::error::ColorParseError;

/// 8-bit RGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Parses `#rrggbb` (case-insensitive digits, leading `#` required).
    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let digits = text
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorParseError(text.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError(text.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Rendering style for one motion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionStyle {
    /// Flat color for cells carrying the body overlay
    pub body_color: Rgb,
    /// Accent ramp, entry 0 innermost/quietest, last entry outermost/loudest
    pub accent_ramp: Vec<Rgb>,
}

impl MotionStyle {
    /// The editor's default palette: black bodies, one scarf ramp per motion
    /// (cream-to-green, cream-to-dark-green via red, cream-to-crimson).
    pub fn default_set() -> [MotionStyle; MOTION_COUNT] {
        [
            MotionStyle {
                body_color: Rgb::BLACK,
                accent_ramp: vec![
                    Rgb::new(0xe2, 0xd8, 0xbc),
                    Rgb::new(0x57, 0x93, 0x55),
                    Rgb::new(0x2f, 0x5e, 0x1f),
                ],
            },
            MotionStyle {
                body_color: Rgb::BLACK,
                accent_ramp: vec![
                    Rgb::new(0xe2, 0xd8, 0xbc),
                    Rgb::new(0xc1, 0x00, 0x00),
                    Rgb::new(0x2f, 0x5e, 0x1f),
                ],
            },
            MotionStyle {
                body_color: Rgb::BLACK,
                accent_ramp: vec![
                    Rgb::new(0xe2, 0xd8, 0xb8),
                    Rgb::new(0xe1, 0x7a, 0x7a),
                    Rgb::new(0x9b, 0x00, 0x00),
                ],
            },
        ]
    }
}
