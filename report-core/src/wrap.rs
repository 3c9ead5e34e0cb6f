use crate::fonts::{FontFace, TextMeasure};

/// Appended to text cut short by [`fit_with_ellipsis`].
pub const ELLIPSIS: &str = "…";

/// Break `text` into lines no wider than `max_width`.
///
/// Words are taken greedily left to right: a word joins the current line
/// only while the joined line still measures within `max_width`. A word
/// that is wider than `max_width` on its own is placed alone on a line,
/// unsplit. Every `\n` starts a new line, so empty paragraphs come back as
/// empty lines. Never returns an empty vector; empty input yields `[""]`.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    size: f64,
    face: FontFace,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    for para in text.split('\n') {
        wrap_paragraph(para, max_width, size, face, measure, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    para: &str,
    max_width: f64,
    size: f64,
    face: FontFace,
    measure: &dyn TextMeasure,
    out: &mut Vec<String>,
) {
    let mut current = String::new();
    for word in para.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure.text_width(&candidate, face, size) <= max_width {
            current = candidate;
        } else {
            out.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    out.push(current);
}

/// Return `text` if it fits `max_width`, otherwise the longest prefix that
/// fits once [`ELLIPSIS`] is appended.
///
/// The prefix length is found by binary search, so the result is the exact
/// best fit for the measuring font. Trailing whitespace before the ellipsis
/// is dropped. When not even the ellipsis fits, the ellipsis alone is
/// returned.
pub fn fit_with_ellipsis(
    text: &str,
    max_width: f64,
    size: f64,
    face: FontFace,
    measure: &dyn TextMeasure,
) -> String {
    if measure.text_width(text, face, size) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let clipped = |n: usize| -> String {
        let prefix: String = chars[..n].iter().collect();
        format!("{}{}", prefix.trim_end(), ELLIPSIS)
    };
    let fits = |n: usize| measure.text_width(&clipped(n), face, size) <= max_width;

    if !fits(0) {
        return ELLIPSIS.to_string();
    }
    let (mut lo, mut hi) = (0usize, chars.len());
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    clipped(lo)
}
