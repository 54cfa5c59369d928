// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Parsing of CSS-style color strings.
//!
//! Label colors are stored as `rgba(r, g, b, a)` strings in the data model
//! so exported annotation files stay compatible with downstream consumers.
//! This module converts them to channel values and derives the fully
//! opaque variant used for point-marker strokes.

/// Parsed color: byte channels plus a 0.0..=1.0 alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

/// Fallback used when a color string fails to parse.
pub const FALLBACK: Rgba = Rgba {
    r: 255,
    g: 255,
    b: 255,
    alpha: 0.7,
};

/// Parse an `rgba(r, g, b, a)` or `rgb(r, g, b)` string.
pub fn parse(s: &str) -> Option<Rgba> {
    let s = s.trim();
    let inner = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut parts = inner.split(',').map(str::trim);
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    let alpha = match parts.next() {
        Some(a) => a.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(Rgba { r, g, b, alpha })
}

/// Parse a color string, falling back to [`FALLBACK`] on malformed input.
pub fn parse_or_fallback(s: &str) -> Rgba {
    parse(s).unwrap_or(FALLBACK)
}

impl Rgba {
    /// The same color with alpha forced to fully opaque.
    pub fn solid(self) -> Rgba {
        Rgba { alpha: 1.0, ..self }
    }

    /// Alpha as a byte channel.
    pub fn alpha_u8(self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        let c = parse("rgba(239, 68, 68, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b), (239, 68, 68));
        assert!((c.alpha - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_rgb_defaults_opaque() {
        let c = parse("rgb(10, 20, 30)").unwrap();
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("").is_none());
        assert!(parse("hsl(1, 2, 3)").is_none());
        assert!(parse("rgba(1, 2)").is_none());
        assert!(parse("rgba(256, 0, 0, 1)").is_none());
        assert!(parse("rgba(1, 2, 3, 1, 5)").is_none());
    }

    #[test]
    fn test_solid_strips_alpha() {
        let c = parse("rgba(59, 130, 246, 0.5)").unwrap().solid();
        assert_eq!(c.alpha, 1.0);
        assert_eq!((c.r, c.g, c.b), (59, 130, 246));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(parse_or_fallback("not a color"), FALLBACK);
    }
}
