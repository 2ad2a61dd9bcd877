// Simple color struct, created from an unsigned 32 representing RRGGBBAA
// or parsed from a CSS hex string such as "#aaa" or "#929292"

use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    // Canvas fill/stroke style string. Alpha goes through the context's
    // global alpha, but a translucent palette entry still keeps its own.
    pub fn to_css(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}'", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        // Short forms repeat each digit: "#abc" == "#aabbcc"
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_owned(),
            _ => return Err(err()),
        };
        let value = u32::from_str_radix(&expanded, 16).map_err(|_| err())?;
        if expanded.len() == 6 {
            Ok(Color::from_u32((value << 8) | 0xff))
        } else {
            Ok(Color::from_u32(value))
        }
    }
}
