use serde::Deserialize;

use crate::error::{Error, Result};

/// Fixed page layout in PDF points (1/72 inch), origin at the bottom-left.
///
/// The content area is the band between the header chrome at the top and
/// the footer chrome at the bottom, each separated from content by `gap`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub header_height: f64,
    pub footer_height: f64,
    pub gap: f64,
}

impl PageGeometry {
    /// ISO A4 portrait.
    pub const A4: PageGeometry = PageGeometry {
        page_width: 595.28,
        page_height: 841.89,
        margin_left: 40.0,
        margin_right: 40.0,
        header_height: 78.0,
        footer_height: 36.0,
        gap: 14.0,
    };

    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Highest y a block may start at.
    pub fn content_top(&self) -> f64 {
        self.page_height - self.header_height - self.gap
    }

    /// Lowest y a block may reach.
    pub fn content_bottom(&self) -> f64 {
        self.footer_height + self.gap
    }

    pub fn content_height(&self) -> f64 {
        self.content_top() - self.content_bottom()
    }

    /// Right edge of the content area.
    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin_right
    }

    /// Reject layouts that leave no positive content area.
    pub fn validate(&self) -> Result<()> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "page size {}x{} must be positive",
                self.page_width, self.page_height
            )));
        }
        if self.header_height < 0.0 || self.footer_height < 0.0 || self.gap < 0.0 {
            return Err(Error::InvalidGeometry(
                "header, footer and gap must not be negative".to_string(),
            ));
        }
        if self.content_height() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "header {} + footer {} + gaps leave no room on a {}pt page",
                self.header_height, self.footer_height, self.page_height
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "margins {} + {} exceed page width {}",
                self.margin_left, self.margin_right, self.page_width
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::A4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> PageGeometry {
        PageGeometry {
            page_width: 600.0,
            page_height: 800.0,
            margin_left: 50.0,
            margin_right: 50.0,
            header_height: 60.0,
            footer_height: 40.0,
            gap: 10.0,
        }
    }

    #[test]
    fn derived_bounds() {
        let g = simple();
        assert_eq!(g.content_width(), 500.0);
        assert_eq!(g.content_top(), 730.0);
        assert_eq!(g.content_bottom(), 50.0);
        assert_eq!(g.content_height(), 680.0);
        assert_eq!(g.content_right(), 550.0);
    }

    #[test]
    fn a4_is_valid() {
        assert!(PageGeometry::A4.validate().is_ok());
        assert!(PageGeometry::A4.content_height() > 600.0);
    }

    #[test]
    fn chrome_taller_than_page_is_rejected() {
        let mut g = simple();
        g.header_height = 500.0;
        g.footer_height = 300.0;
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        let mut g = simple();
        g.margin_left = 400.0;
        g.margin_right = 300.0;
        assert!(g.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_a4() {
        let g: PageGeometry = serde_json::from_str(r#"{ "gap": 20.0 }"#).unwrap();
        assert_eq!(g.gap, 20.0);
        assert_eq!(g.page_width, PageGeometry::A4.page_width);
    }
}
