use chrono::{Local, NaiveDateTime};
use serde::Deserialize;

use crate::color::StatusColour;
use crate::error::Result;
use crate::fonts::FontSource;
use crate::geometry::PageGeometry;

/// Fixed branding drawn in the page chrome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Header brand title.
    pub name: String,
    /// Line under the brand title.
    pub tagline: String,
    /// Footer caption on the left.
    pub caption: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        BrandConfig {
            name: "ELEC-MATE".to_string(),
            tagline: "Site Safety Records".to_string(),
            caption: "Generated by Elec-Mate".to_string(),
        }
    }
}

/// Everything about a session that is not per-document.
///
/// ```
/// # use report_core::SessionConfig;
/// let cfg = SessionConfig::from_json(r#"{ "brand": { "name": "ACME" } }"#).unwrap();
/// assert_eq!(cfg.brand.name, "ACME");
/// assert_eq!(cfg.brand.tagline, "Site Safety Records");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub geometry: PageGeometry,
    pub brand: BrandConfig,
    pub regular_font: FontSource,
    pub bold_font: FontSource,
}

impl SessionConfig {
    /// Decode a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-document values shown in the header and written to the metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub title: String,
    pub reference: String,
    pub status_label: String,
    pub status: StatusColour,
    /// Shown as the header date and footer timestamp on every page.
    pub issued_at: NaiveDateTime,
}

impl DocumentMeta {
    /// Metadata stamped with the current local time.
    pub fn new(
        title: impl Into<String>,
        reference: impl Into<String>,
        status_label: impl Into<String>,
        status: StatusColour,
    ) -> Self {
        DocumentMeta {
            title: title.into(),
            reference: reference.into(),
            status_label: status_label.into(),
            status,
            issued_at: Local::now().naive_local(),
        }
    }

    pub fn issued_at(mut self, at: NaiveDateTime) -> Self {
        self.issued_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(SessionConfig::from_json("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn font_sources_decode() {
        let cfg = SessionConfig::from_json(
            r#"{ "regular_font": { "file": "fonts/Inter.ttf" }, "bold_font": "builtin" }"#,
        )
        .unwrap();
        assert_eq!(cfg.regular_font, FontSource::File("fonts/Inter.ttf".into()));
        assert_eq!(cfg.bold_font, FontSource::Builtin);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = SessionConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn issued_at_overrides_clock() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let meta = DocumentMeta::new("T", "R", "ok", StatusColour::Success).issued_at(at);
        assert_eq!(meta.issued_at, at);
    }
}
