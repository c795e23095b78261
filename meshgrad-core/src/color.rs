//! Hex color parsing with render-time fallbacks.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Substituted for any point color that fails to parse.
pub const POINT_FALLBACK: Rgb = Rgb::new(107, 70, 193);

/// Substituted for a background color that fails to parse.
pub const BACKGROUND_FALLBACK: Rgb = Rgb::BLACK;

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `#RGB`, or the same without the leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] if the string is not 3 or 6 hex digits.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(input.to_string());
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(err()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse a hex color, substituting `fallback` when it is malformed.
    #[must_use]
    pub fn parse_or(input: &str, fallback: Self) -> Self {
        Self::parse_hex(input).unwrap_or_else(|e| {
            tracing::trace!("{e}, using fallback {fallback}");
            fallback
        })
    }

    /// Parse a point color, falling back to [`POINT_FALLBACK`].
    #[must_use]
    pub fn point_color(input: &str) -> Self {
        Self::parse_or(input, POINT_FALLBACK)
    }

    /// Parse a background color, falling back to [`BACKGROUND_FALLBACK`].
    #[must_use]
    pub fn background_color(input: &str) -> Self {
        Self::parse_or(input, BACKGROUND_FALLBACK)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        assert_eq!(Rgb::parse_hex("#6b46c1"), Ok(Rgb::new(0x6b, 0x46, 0xc1)));
        assert_eq!(Rgb::parse_hex("9F7AEA"), Ok(Rgb::new(0x9f, 0x7a, 0xea)));
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(Rgb::parse_hex("#fa0"), Ok(Rgb::new(0xff, 0xaa, 0x00)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgb::parse_hex("").is_err());
        assert!(Rgb::parse_hex("#12345").is_err());
        assert!(Rgb::parse_hex("#gg0000").is_err());
        assert!(Rgb::parse_hex("rgb(1,2,3)").is_err());
        assert!(Rgb::parse_hex("#ééé").is_err());
        assert!(Rgb::parse_hex("#+f0000").is_err());
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(Rgb::point_color("not a color"), POINT_FALLBACK);
        assert_eq!(Rgb::background_color("#zzz"), Rgb::BLACK);
        assert_eq!(Rgb::point_color("#ffffff"), Rgb::WHITE);
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgb::new(1, 162, 255);
        assert_eq!(c.to_string(), "#01a2ff");
        assert_eq!(c.to_string().parse::<Rgb>(), Ok(c));
    }
}
