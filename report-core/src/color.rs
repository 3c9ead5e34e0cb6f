use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// RGB color for PDF graphics operations.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Create a color from RGB components (each 0.0–1.0).
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub const fn gray(level: f64) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Mix toward white. `amount` 0.0 keeps the color, 1.0 gives white.
    pub fn tint(self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        Color {
            r: self.r + (1.0 - self.r) * t,
            g: self.g + (1.0 - self.g) * t,
            b: self.b + (1.0 - self.b) * t,
        }
    }
}

pub const WHITE: Color = Color::gray(1.0);
/// Body text.
pub const INK: Color = Color::rgb(0.11, 0.13, 0.16);
/// Labels, captions and small print.
pub const MUTED: Color = Color::rgb(0.42, 0.45, 0.50);
/// Dividers and cell borders.
pub const RULE: Color = Color::rgb(0.84, 0.86, 0.89);
/// Background of even-indexed table rows.
pub const ZEBRA: Color = Color::rgb(0.96, 0.97, 0.98);
/// Header band and table header fill.
pub const BAND: Color = Color::rgb(0.09, 0.11, 0.15);
/// Brand accent used for section bars.
pub const ACCENT: Color = Color::rgb(0.98, 0.78, 0.11);

/// Semantic colour shared by the header status dot, banners, box accents,
/// checklist indicators and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColour {
    Success,
    Warning,
    Danger,
    Info,
    #[serde(alias = "gray")]
    Grey,
}

impl StatusColour {
    pub const ALL: [StatusColour; 5] = [
        StatusColour::Success,
        StatusColour::Warning,
        StatusColour::Danger,
        StatusColour::Info,
        StatusColour::Grey,
    ];

    pub fn color(self) -> Color {
        match self {
            StatusColour::Success => Color::rgb(0.13, 0.59, 0.33),
            StatusColour::Warning => Color::rgb(0.92, 0.58, 0.05),
            StatusColour::Danger => Color::rgb(0.86, 0.18, 0.18),
            StatusColour::Info => Color::rgb(0.15, 0.45, 0.85),
            StatusColour::Grey => Color::rgb(0.45, 0.48, 0.52),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            StatusColour::Success => "success",
            StatusColour::Warning => "warning",
            StatusColour::Danger => "danger",
            StatusColour::Info => "info",
            StatusColour::Grey => "grey",
        }
    }
}

impl FromStr for StatusColour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(StatusColour::Success),
            "warning" => Ok(StatusColour::Warning),
            "danger" => Ok(StatusColour::Danger),
            "info" => Ok(StatusColour::Info),
            "grey" | "gray" => Ok(StatusColour::Grey),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for StatusColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_key() {
        for status in StatusColour::ALL {
            assert_eq!(status.key().parse::<StatusColour>().unwrap(), status);
        }
        assert_eq!("GRAY".parse::<StatusColour>().unwrap(), StatusColour::Grey);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = "major".parse::<StatusColour>().unwrap_err();
        assert!(matches!(err, Error::UnknownStatus(k) if k == "major"));
    }

    #[test]
    fn palette_entries_are_distinct() {
        for a in StatusColour::ALL {
            for b in StatusColour::ALL {
                if a != b {
                    assert_ne!(a.color(), b.color());
                }
            }
        }
    }

    #[test]
    fn tint_moves_toward_white() {
        let c = Color::rgb(0.0, 0.5, 1.0).tint(0.5);
        assert_eq!(c, Color::rgb(0.5, 0.75, 1.0));
        let white = Color::gray(0.2).tint(1.0);
        assert!((white.r - 1.0).abs() < 1e-12);
        assert_eq!(Color::gray(0.2).tint(-3.0), Color::gray(0.2));
    }

    #[test]
    fn deserializes_lowercase_keys() {
        let s: StatusColour = serde_json::from_str("\"danger\"").unwrap();
        assert_eq!(s, StatusColour::Danger);
    }
}
