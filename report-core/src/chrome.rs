use crate::color::{Color, ACCENT, BAND, MUTED, RULE, WHITE};
use crate::config::{BrandConfig, DocumentMeta};
use crate::draw::{Sketch, Stroke};
use crate::fonts::FontFace;
use crate::geometry::PageGeometry;
use crate::wrap::fit_with_ellipsis;

/// Characters of the reference id shown in the header.
pub const REFERENCE_CHARS: usize = 8;

const HEADER_TEXT: Color = Color::rgb(0.72, 0.75, 0.80);

pub fn header_date(meta: &DocumentMeta) -> String {
    meta.issued_at.format("%d %b %Y").to_string()
}

pub fn footer_timestamp(meta: &DocumentMeta) -> String {
    meta.issued_at.format("Generated %d %b %Y %H:%M").to_string()
}

/// `REF:` label with the reference upper-cased and cut to
/// [`REFERENCE_CHARS`].
pub fn reference_label(reference: &str) -> String {
    let short: String = reference.trim().chars().take(REFERENCE_CHARS).collect();
    format!("REF: {}", short.to_uppercase())
}

pub fn page_label(page: u32) -> String {
    format!("Page {}", page)
}

/// Draw the header band. Called whenever a page is opened.
pub fn render_header(
    sketch: &mut Sketch<'_>,
    geometry: &PageGeometry,
    brand: &BrandConfig,
    meta: &DocumentMeta,
) {
    let top = geometry.page_height;
    let band_bottom = top - geometry.header_height;
    let left = geometry.margin_left;
    let right = geometry.content_right();
    let row1 = top - geometry.header_height * 0.38;
    let row2 = top - geometry.header_height * 0.56;
    let row3 = top - geometry.header_height * 0.80;

    sketch.fill_rect(0.0, band_bottom, geometry.page_width, geometry.header_height, BAND);
    sketch.fill_rect(0.0, band_bottom, geometry.page_width, 3.0, ACCENT);

    sketch.text(&brand.name, left, row1, FontFace::Bold, 15.0, WHITE);
    sketch.text(&brand.tagline, left, row2, FontFace::Regular, 8.0, HEADER_TEXT);

    let title = fit_with_ellipsis(
        &meta.title.to_uppercase(),
        geometry.content_width() / 2.0,
        12.0,
        FontFace::Bold,
        sketch.measure(),
    );
    sketch.text_right(&title, right, row1, FontFace::Bold, 12.0, WHITE);
    sketch.text_right(
        &reference_label(&meta.reference),
        right,
        row2,
        FontFace::Regular,
        8.0,
        HEADER_TEXT,
    );

    // Status: dot then label, centred as a unit.
    let status = meta.status_label.to_uppercase();
    let colour = meta.status.color();
    let dot = 3.5;
    let label_w = sketch.width_of(&status, FontFace::Bold, 8.0);
    let unit_w = dot * 2.0 + 5.0 + label_w;
    let start = geometry.page_width / 2.0 - unit_w / 2.0;
    sketch.circle(start + dot, row3 + 2.8, dot, colour);
    sketch.text(&status, start + dot * 2.0 + 5.0, row3, FontFace::Bold, 8.0, colour);

    sketch.text_right(&header_date(meta), right, row3, FontFace::Regular, 8.0, HEADER_TEXT);
}

/// Draw the footer. Called only when a page is closed.
pub fn render_footer(
    sketch: &mut Sketch<'_>,
    geometry: &PageGeometry,
    brand: &BrandConfig,
    meta: &DocumentMeta,
    page: u32,
) {
    let left = geometry.margin_left;
    let right = geometry.content_right();
    let rule_y = geometry.footer_height - 6.0;
    let baseline = geometry.footer_height * 0.4;

    sketch.hrule(left, right, rule_y, Stroke::new(RULE, 0.75));
    sketch.text(&brand.caption, left, baseline, FontFace::Regular, 7.0, MUTED);
    sketch.text_centered(
        &footer_timestamp(meta),
        geometry.page_width / 2.0,
        baseline,
        FontFace::Regular,
        7.0,
        MUTED,
    );
    sketch.text_right(&page_label(page), right, baseline, FontFace::Bold, 7.0, MUTED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StatusColour;
    use crate::draw::{DrawOp, Frame};
    use crate::fonts::BuiltinFont;
    use chrono::NaiveDate;

    struct Helvetica;

    impl crate::fonts::TextMeasure for Helvetica {
        fn text_width(&self, text: &str, face: FontFace, size: f64) -> f64 {
            BuiltinFont::for_face(face).measure(text, size)
        }
    }

    fn meta() -> DocumentMeta {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        DocumentMeta::new("Accident / Incident Record", "abc123-def456", "major", StatusColour::Danger)
            .issued_at(at)
    }

    fn texts(ops: &[DrawOp]) -> Vec<(String, f64)> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, .. } => Some((text.clone(), *x)),
                _ => None,
            })
            .collect()
    }

    fn header_ops() -> Vec<DrawOp> {
        let g = PageGeometry::A4;
        let mut sketch = Sketch::new(
            Frame {
                left: g.margin_left,
                width: g.content_width(),
            },
            &Helvetica,
        );
        render_header(&mut sketch, &g, &BrandConfig::default(), &meta());
        sketch.into_ops()
    }

    #[test]
    fn reference_is_truncated_and_uppercased() {
        assert_eq!(reference_label("abc123-def456"), "REF: ABC123-D");
        assert_eq!(reference_label("x1"), "REF: X1");
    }

    #[test]
    fn dates_are_formatted() {
        assert_eq!(header_date(&meta()), "18 Oct 2026");
        assert_eq!(footer_timestamp(&meta()), "Generated 18 Oct 2026 14:05");
    }

    #[test]
    fn title_is_uppercased_and_right_aligned() {
        let g = PageGeometry::A4;
        let ops = header_ops();
        let (_, x) = texts(&ops)
            .into_iter()
            .find(|(t, _)| t == "ACCIDENT / INCIDENT RECORD")
            .expect("title drawn");
        let w = BuiltinFont::HelveticaBold.measure("ACCIDENT / INCIDENT RECORD", 12.0);
        assert!((x + w - g.content_right()).abs() < 1e-9);
    }

    #[test]
    fn status_dot_uses_palette_colour() {
        let ops = header_ops();
        let danger = StatusColour::Danger.color();
        assert!(ops
            .iter()
            .any(|op| matches!(op, DrawOp::Circle { fill, .. } if *fill == danger)));
        assert!(texts(&ops).iter().any(|(t, _)| t == "MAJOR"));
    }

    #[test]
    fn footer_carries_page_number() {
        let g = PageGeometry::A4;
        let mut sketch = Sketch::new(
            Frame {
                left: g.margin_left,
                width: g.content_width(),
            },
            &Helvetica,
        );
        render_footer(&mut sketch, &g, &BrandConfig::default(), &meta(), 3);
        let ops = sketch.into_ops();
        let labels: Vec<String> = texts(&ops).into_iter().map(|(t, _)| t).collect();
        assert!(labels.contains(&"Page 3".to_string()));
        assert!(labels.contains(&"Generated by Elec-Mate".to_string()));
        assert!(matches!(ops[0], DrawOp::Line { .. }));
    }
}
