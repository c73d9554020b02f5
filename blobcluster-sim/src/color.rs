//! Colour parsing and the linear blend scale

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Named colours accepted in configuration files
const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("steelblue", Rgb::new(70, 130, 180)),
    ("teal", Rgb::new(0, 128, 128)),
    ("gold", Rgb::new(255, 215, 0)),
];

/// An opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or a named colour
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        let invalid = || ConfigError::InvalidColor(value.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
                [r1, r0, g1, g0, b1, b0] => {
                    Ok(Self::new(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0))
                }
                _ => Err(invalid()),
            };
        }

        NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, rgb)| *rgb)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Linear scale from a numeric domain to a pair of colours.
///
/// Values outside the domain extrapolate; each channel is rounded and then
/// clamped into `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: (f64, f64),
    range: (Rgb, Rgb),
}

impl ColorScale {
    /// Scale over the domain `[0, 1]`
    pub fn new(from: Rgb, to: Rgb) -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (from, to),
        }
    }

    pub fn with_domain(mut self, start: f64, end: f64) -> Self {
        self.domain = (start, end);
        self
    }

    /// Map a blend value to a colour
    pub fn apply(&self, value: f64) -> Rgb {
        let (d0, d1) = self.domain;
        let t = if d1 == d0 { 0.0 } else { (value - d0) / (d1 - d0) };
        let (a, b) = self.range;
        let channel = |from: u8, to: u8| -> u8 {
            let v = (from as f64 + (to as f64 - from as f64) * t).round();
            v.clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgb::parse("#ff0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::parse("#0F8").unwrap(), Rgb::new(0, 255, 136));
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#gg0000").is_err());
    }

    #[test]
    fn parses_named_colours_case_insensitive() {
        assert_eq!(Rgb::parse("Blue").unwrap(), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::parse(" steelblue ").unwrap(), Rgb::new(70, 130, 180));
        assert!(Rgb::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Rgb::new(255, 0, 10).to_string(), "#ff000a");
    }

    #[test]
    fn scale_hits_endpoints() {
        let scale = ColorScale::default();
        assert_eq!(scale.apply(0.0), Rgb::new(255, 0, 0));
        assert_eq!(scale.apply(1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn scale_interpolates_midpoint() {
        let scale = ColorScale::default();
        // 127.5 rounds up
        assert_eq!(scale.apply(0.5), Rgb::new(128, 0, 128));
    }

    #[test]
    fn scale_clamps_extrapolated_values() {
        let scale = ColorScale::default();
        assert_eq!(scale.apply(2.0), Rgb::new(0, 0, 255));
        assert_eq!(scale.apply(-1.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn custom_domain() {
        let scale = ColorScale::default().with_domain(0.0, 2.0);
        assert_eq!(scale.apply(1.0), Rgb::new(128, 0, 128));
    }
}
