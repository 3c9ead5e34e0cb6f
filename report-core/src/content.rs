//! Content blocks: one type per content shape, each knowing its height
//! and how to draw itself at a given top edge.
//!
//! Builders take a [`TextMeasure`] so wrapping and ellipsis truncation are
//! resolved before a block reaches the pagination controller; `height()`
//! is then plain arithmetic.

use crate::color::{Color, StatusColour, ACCENT, BAND, INK, MUTED, RULE, WHITE, ZEBRA};
use crate::draw::{Sketch, Stroke};
use crate::fonts::{FontFace, TextMeasure};
use crate::layout::Block;
use crate::wrap::{fit_with_ellipsis, wrap_text};

/// Body text size.
pub const BODY_SIZE: f64 = 9.5;
/// Line height as a multiple of font size for flowing text.
pub const LINE_FACTOR: f64 = 1.55;

pub const SECTION_HEIGHT: f64 = 30.0;
pub const GRID_ROW_HEIGHT: f64 = 30.0;
pub const BANNER_HEIGHT: f64 = 30.0;
pub const TABLE_HEADER_HEIGHT: f64 = 22.0;
pub const TABLE_ROW_HEIGHT: f64 = 20.0;
pub const CHECK_ROW_HEIGHT: f64 = 22.0;
pub const CHECK_NOTES_HEIGHT: f64 = 12.0;
pub const BADGE_HEIGHT: f64 = 18.0;
pub const BADGE_ROW_GAP: f64 = 6.0;
pub const SIGNATURE_HEIGHT: f64 = 86.0;
pub const LABELLED_HEIGHT: f64 = 16.0;

/// Shown in place of an empty table.
pub const NO_RECORDS: &str = "No records";

const TABLE_SIZE: f64 = 8.5;
const TABLE_HEADER_SIZE: f64 = 8.0;
const CELL_PAD: f64 = 5.0;
const BOX_PAD: f64 = 8.0;
const ACCENT_W: f64 = 3.0;
const BADGE_PAD: f64 = 8.0;
const BADGE_GAP: f64 = 6.0;
const BADGE_SIZE: f64 = 7.5;
const FOOTNOTE_SIZE: f64 = 7.0;
const BULLET_INDENT: f64 = 12.0;
const SIGNATURE_GAP: f64 = 12.0;

// -------------------------------------------------------
// Input types
// -------------------------------------------------------

/// One cell of a key-value grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub label: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One checklist line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub label: String,
    pub passed: bool,
    /// Adds one extra line under the item.
    pub notes: Option<String>,
}

impl ChecklistItem {
    pub fn new(label: impl Into<String>, passed: bool) -> Self {
        ChecklistItem {
            label: label.into(),
            passed,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A party signing the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParty {
    pub role: String,
    pub name: Option<String>,
    pub date: Option<String>,
}

impl SignatureParty {
    pub fn new(role: impl Into<String>) -> Self {
        SignatureParty {
            role: role.into(),
            name: None,
            date: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

fn line_height(size: f64) -> f64 {
    size * LINE_FACTOR
}

/// Baseline offset from the top of a line box.
fn ascent(size: f64) -> f64 {
    size * 1.15
}

// -------------------------------------------------------
// Section header
// -------------------------------------------------------

pub struct SectionHeader {
    title: String,
}

impl SectionHeader {
    pub fn new(title: &str) -> Self {
        SectionHeader {
            title: title.to_uppercase(),
        }
    }
}

impl Block for SectionHeader {
    fn height(&self) -> f64 {
        SECTION_HEIGHT
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        s.fill_rect(f.left, top - 19.0, 3.5, 13.0, ACCENT);
        s.text(&self.title, f.left + 10.0, top - 16.0, FontFace::Bold, 11.0, INK);
        s.hrule(f.left, f.right(), top - 23.0, Stroke::new(RULE, 0.75));
    }
}

// -------------------------------------------------------
// Key-value grid
// -------------------------------------------------------

/// One row of a key-value grid; each row is placed atomically.
pub struct GridRow {
    cells: Vec<(String, String)>,
    cols: usize,
}

/// Split `pairs` into rows of `cols` cells, truncating values that exceed
/// their column budget.
pub fn grid_rows(pairs: &[KeyValue], cols: usize, width: f64, m: &dyn TextMeasure) -> Vec<GridRow> {
    let cols = cols.max(1);
    let budget = width / cols as f64 - 2.0 * CELL_PAD;
    pairs
        .chunks(cols)
        .map(|chunk| GridRow {
            cells: chunk
                .iter()
                .map(|kv| {
                    (
                        fit_with_ellipsis(&kv.label.to_uppercase(), budget, 7.0, FontFace::Regular, m),
                        fit_with_ellipsis(&kv.value, budget, BODY_SIZE, FontFace::Bold, m),
                    )
                })
                .collect(),
            cols,
        })
        .collect()
}

impl Block for GridRow {
    fn height(&self) -> f64 {
        GRID_ROW_HEIGHT
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let col_w = f.width / self.cols as f64;
        for (i, (label, value)) in self.cells.iter().enumerate() {
            let x = f.left + i as f64 * col_w + CELL_PAD;
            s.text(label, x, top - 9.0, FontFace::Regular, 7.0, MUTED);
            s.text(value, x, top - 21.0, FontFace::Bold, BODY_SIZE, INK);
        }
        s.hrule(f.left, f.right(), top - GRID_ROW_HEIGHT + 2.0, Stroke::new(RULE, 0.5));
    }
}

// -------------------------------------------------------
// Flowing text
// -------------------------------------------------------

/// One line of a paragraph or bullet item.
pub struct TextLine {
    text: String,
    face: FontFace,
    size: f64,
    color: Color,
    indent: f64,
    bullet: bool,
}

impl TextLine {
    /// Plain body-text lines for `text` wrapped to `width`.
    pub fn paragraph(text: &str, width: f64, m: &dyn TextMeasure) -> Vec<TextLine> {
        wrap_text(text, width, BODY_SIZE, FontFace::Regular, m)
            .into_iter()
            .map(|line| TextLine {
                text: line,
                face: FontFace::Regular,
                size: BODY_SIZE,
                color: INK,
                indent: 0.0,
                bullet: false,
            })
            .collect()
    }

    /// Lines of one bullet item; only the first carries the marker.
    pub fn bullet_item(text: &str, width: f64, m: &dyn TextMeasure) -> Vec<TextLine> {
        wrap_text(text, width - BULLET_INDENT, BODY_SIZE, FontFace::Regular, m)
            .into_iter()
            .enumerate()
            .map(|(i, line)| TextLine {
                text: line,
                face: FontFace::Regular,
                size: BODY_SIZE,
                color: INK,
                indent: BULLET_INDENT,
                bullet: i == 0,
            })
            .collect()
    }

    pub fn has_bullet(&self) -> bool {
        self.bullet
    }
}

impl Block for TextLine {
    fn height(&self) -> f64 {
        line_height(self.size)
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let baseline = top - ascent(self.size);
        let x = s.frame.left + self.indent;
        if self.bullet {
            s.circle(s.frame.left + 4.0, baseline + self.size * 0.32, 1.6, self.color);
        }
        s.text(&self.text, x, baseline, self.face, self.size, self.color);
    }
}

// -------------------------------------------------------
// Text box
// -------------------------------------------------------

/// Bordered box with a coloured left accent; placed atomically.
pub struct TextBox {
    lines: Vec<String>,
    accent: Color,
}

impl TextBox {
    pub fn new(text: &str, status: StatusColour, width: f64, m: &dyn TextMeasure) -> Self {
        let inner = width - ACCENT_W - 2.0 * BOX_PAD;
        TextBox {
            lines: wrap_text(text, inner, BODY_SIZE, FontFace::Regular, m),
            accent: status.color(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Block for TextBox {
    fn height(&self) -> f64 {
        self.lines.len() as f64 * line_height(BODY_SIZE) + 2.0 * BOX_PAD
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let h = self.height();
        s.fill_rect(f.left, top - h, f.width, h, self.accent.tint(0.9));
        s.fill_rect(f.left, top - h, ACCENT_W, h, self.accent);
        let x = f.left + ACCENT_W + BOX_PAD;
        let mut line_top = top - BOX_PAD;
        for line in &self.lines {
            s.text(line, x, line_top - ascent(BODY_SIZE), FontFace::Regular, BODY_SIZE, INK);
            line_top -= line_height(BODY_SIZE);
        }
    }
}

// -------------------------------------------------------
// Warning banner
// -------------------------------------------------------

pub struct Banner {
    text: String,
}

impl Banner {
    /// Prefixes `WARNING:` unless the text already starts with it.
    pub fn warning(text: &str, width: f64, m: &dyn TextMeasure) -> Self {
        let trimmed = text.trim();
        let full = if trimmed.to_uppercase().starts_with("WARNING:") {
            trimmed.to_string()
        } else {
            format!("WARNING: {}", trimmed)
        };
        Banner {
            text: fit_with_ellipsis(&full, width - 2.0 * BOX_PAD, BODY_SIZE, FontFace::Bold, m),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Block for Banner {
    fn height(&self) -> f64 {
        BANNER_HEIGHT
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let danger = StatusColour::Danger.color();
        let box_h = BANNER_HEIGHT - 6.0;
        s.fill_rect(f.left, top - box_h, f.width, box_h, danger.tint(0.88));
        s.stroke_rect(f.left, top - box_h, f.width, box_h, Stroke::new(danger, 0.75));
        s.text_centered(&self.text, f.center(), top - 15.5, FontFace::Bold, BODY_SIZE, danger);
    }
}

// -------------------------------------------------------
// Table
// -------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Body { zebra: bool },
    Placeholder,
}

/// One table row, header included; placed atomically.
pub struct TableRow {
    cells: Vec<String>,
    widths: Vec<f64>,
    kind: RowKind,
}

impl TableRow {
    pub fn kind(&self) -> RowKind {
        self.kind
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Column widths filling `total`: each column's natural width (widest
/// header or cell plus padding), scaled so the sum equals `total`.
pub fn column_widths(headers: &[String], rows: &[Vec<String>], total: f64, m: &dyn TextMeasure) -> Vec<f64> {
    let cols = table_columns(headers, rows);
    if cols == 0 {
        return vec![total];
    }
    let mut natural = vec![0.0_f64; cols];
    for (i, h) in headers.iter().enumerate() {
        natural[i] = natural[i].max(m.text_width(h, FontFace::Bold, TABLE_HEADER_SIZE));
    }
    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            natural[i] = natural[i].max(m.text_width(cell, FontFace::Regular, TABLE_SIZE));
        }
    }
    for w in natural.iter_mut() {
        *w += 2.0 * CELL_PAD;
    }
    let sum: f64 = natural.iter().sum();
    natural.iter().map(|w| w / sum * total).collect()
}

/// Supplied widths, scaled down proportionally when their sum exceeds
/// `total`. Narrower tables are left as given.
pub fn fit_widths(widths: &[f64], total: f64) -> Vec<f64> {
    let sum: f64 = widths.iter().sum();
    if sum > total && sum > 0.0 {
        widths.iter().map(|w| w * total / sum).collect()
    } else {
        widths.to_vec()
    }
}

fn table_columns(headers: &[String], rows: &[Vec<String>]) -> usize {
    if headers.is_empty() {
        rows.iter().map(Vec::len).max().unwrap_or(0)
    } else {
        headers.len()
    }
}

/// Header row plus data rows (or the single placeholder row).
pub fn table_rows(
    headers: &[String],
    rows: &[Vec<String>],
    widths: &[f64],
    m: &dyn TextMeasure,
) -> (TableRow, Vec<TableRow>) {
    let fit = |text: &str, w: f64, face: FontFace, size: f64| {
        fit_with_ellipsis(text, w - 2.0 * CELL_PAD, size, face, m)
    };
    let header = TableRow {
        cells: widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let h = headers.get(i).map(String::as_str).unwrap_or("");
                fit(h, *w, FontFace::Bold, TABLE_HEADER_SIZE)
            })
            .collect(),
        widths: widths.to_vec(),
        kind: RowKind::Header,
    };
    if rows.is_empty() {
        let placeholder = TableRow {
            cells: vec![NO_RECORDS.to_string()],
            widths: vec![widths.iter().sum()],
            kind: RowKind::Placeholder,
        };
        return (header, vec![placeholder]);
    }
    let body = rows
        .iter()
        .enumerate()
        .map(|(r, row)| TableRow {
            cells: widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    fit(cell, *w, FontFace::Regular, TABLE_SIZE)
                })
                .collect(),
            widths: widths.to_vec(),
            kind: RowKind::Body { zebra: r % 2 == 0 },
        })
        .collect();
    (header, body)
}

impl Block for TableRow {
    fn height(&self) -> f64 {
        match self.kind {
            RowKind::Header => TABLE_HEADER_HEIGHT,
            _ => TABLE_ROW_HEIGHT,
        }
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let h = self.height();
        let total: f64 = self.widths.iter().sum();
        match self.kind {
            RowKind::Header => s.fill_rect(f.left, top - h, total, h, BAND),
            RowKind::Body { zebra: true } => s.fill_rect(f.left, top - h, total, h, ZEBRA),
            _ => {}
        }
        if self.kind == RowKind::Placeholder {
            s.text_centered(NO_RECORDS, f.left + total / 2.0, top - 13.0, FontFace::Regular, TABLE_SIZE, MUTED);
        } else {
            let (face, size, color) = match self.kind {
                RowKind::Header => (FontFace::Bold, TABLE_HEADER_SIZE, WHITE),
                _ => (FontFace::Regular, TABLE_SIZE, INK),
            };
            let mut x = f.left;
            for (cell, w) in self.cells.iter().zip(&self.widths) {
                s.text(cell, x + CELL_PAD, top - h / 2.0 - size * 0.35, face, size, color);
                x += w;
            }
        }
        s.hrule(f.left, f.left + total, top - h, Stroke::new(RULE, 0.5));
    }
}

// -------------------------------------------------------
// Checklist
// -------------------------------------------------------

pub struct ChecklistRow {
    label: String,
    passed: bool,
    notes: Option<String>,
}

impl ChecklistRow {
    pub fn new(item: &ChecklistItem, width: f64, m: &dyn TextMeasure) -> Self {
        let budget = width - 16.0 - 40.0;
        ChecklistRow {
            label: fit_with_ellipsis(&item.label, budget, BODY_SIZE, FontFace::Regular, m),
            passed: item.passed,
            notes: item
                .notes
                .as_deref()
                .map(|n| fit_with_ellipsis(n, budget, 8.0, FontFace::Regular, m)),
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    pub fn indicator(&self) -> StatusColour {
        if self.passed {
            StatusColour::Success
        } else {
            StatusColour::Danger
        }
    }
}

impl Block for ChecklistRow {
    fn height(&self) -> f64 {
        match self.notes {
            Some(_) => CHECK_ROW_HEIGHT + CHECK_NOTES_HEIGHT,
            None => CHECK_ROW_HEIGHT,
        }
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let colour = self.indicator().color();
        let baseline = top - 14.0;
        s.circle(f.left + 6.0, baseline + 3.0, 4.0, colour);
        s.text(&self.label, f.left + 16.0, baseline, FontFace::Regular, BODY_SIZE, INK);
        s.text_right(self.verdict(), f.right(), baseline, FontFace::Bold, 8.0, colour);
        if let Some(notes) = &self.notes {
            s.text(notes, f.left + 16.0, baseline - CHECK_NOTES_HEIGHT, FontFace::Regular, 8.0, MUTED);
        }
        s.hrule(f.left, f.right(), top - self.height() + 1.0, Stroke::new(RULE, 0.5));
    }
}

// -------------------------------------------------------
// Badges
// -------------------------------------------------------

/// One row of chips; a new row starts when the next chip would pass the
/// content width.
pub struct BadgeRow {
    chips: Vec<(String, f64)>,
    colour: Color,
}

pub fn badge_rows(labels: &[String], status: StatusColour, width: f64, m: &dyn TextMeasure) -> Vec<BadgeRow> {
    let colour = status.color();
    let mut rows = Vec::new();
    let mut current: Vec<(String, f64)> = Vec::new();
    let mut used = 0.0;
    for label in labels {
        let text = fit_with_ellipsis(label, width - 2.0 * BADGE_PAD, BADGE_SIZE, FontFace::Bold, m);
        let chip_w = m.text_width(&text, FontFace::Bold, BADGE_SIZE) + 2.0 * BADGE_PAD;
        let needed = if current.is_empty() { chip_w } else { used + BADGE_GAP + chip_w };
        if needed > width && !current.is_empty() {
            rows.push(BadgeRow {
                chips: std::mem::take(&mut current),
                colour,
            });
            used = chip_w;
        } else {
            used = needed;
        }
        current.push((text, chip_w));
    }
    if !current.is_empty() {
        rows.push(BadgeRow { chips: current, colour });
    }
    rows
}

impl BadgeRow {
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

impl Block for BadgeRow {
    fn height(&self) -> f64 {
        BADGE_HEIGHT + BADGE_ROW_GAP
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let mut x = s.frame.left;
        for (text, w) in &self.chips {
            s.fill_rect(x, top - BADGE_HEIGHT, *w, BADGE_HEIGHT, self.colour.tint(0.85));
            s.stroke_rect(x, top - BADGE_HEIGHT, *w, BADGE_HEIGHT, Stroke::new(self.colour, 0.5));
            s.text(text, x + BADGE_PAD, top - 12.0, FontFace::Bold, BADGE_SIZE, self.colour);
            x += w + BADGE_GAP;
        }
    }
}

// -------------------------------------------------------
// Signature block
// -------------------------------------------------------

/// One or two equal-width signature boxes side by side.
pub struct SignatureRow {
    parties: Vec<SignatureParty>,
}

pub fn signature_rows(parties: &[SignatureParty]) -> Vec<SignatureRow> {
    parties
        .chunks(2)
        .map(|pair| SignatureRow {
            parties: pair.to_vec(),
        })
        .collect()
}

impl Block for SignatureRow {
    fn height(&self) -> f64 {
        SIGNATURE_HEIGHT
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        let n = self.parties.len().max(1) as f64;
        let box_w = (f.width - SIGNATURE_GAP * (n - 1.0)) / n;
        let box_h = SIGNATURE_HEIGHT - 10.0;
        let m = s.measure();
        for (i, party) in self.parties.iter().enumerate() {
            let x = f.left + i as f64 * (box_w + SIGNATURE_GAP);
            let inner = box_w - 16.0;
            s.stroke_rect(x, top - box_h, box_w, box_h, Stroke::new(RULE, 0.75));
            let role = fit_with_ellipsis(&party.role.to_uppercase(), inner, 8.0, FontFace::Bold, m);
            s.text(&role, x + 8.0, top - 14.0, FontFace::Bold, 8.0, MUTED);
            match &party.name {
                Some(name) => {
                    let name = fit_with_ellipsis(name, inner, 10.0, FontFace::Regular, m);
                    s.text(&name, x + 8.0, top - 30.0, FontFace::Regular, 10.0, INK);
                }
                None => s.text("Name: ____________________", x + 8.0, top - 30.0, FontFace::Regular, 9.0, MUTED),
            }
            s.hrule(x + 8.0, x + box_w - 8.0, top - 52.0, Stroke::new(INK, 0.5));
            s.text("Signature", x + 8.0, top - 60.0, FontFace::Regular, 7.0, MUTED);
            let date = match &party.date {
                Some(d) => format!("Date: {}", d),
                None => "Date: ____________".to_string(),
            };
            s.text(&date, x + 8.0, top - 71.0, FontFace::Regular, 8.0, INK);
        }
    }
}

// -------------------------------------------------------
// Labelled value and footnote
// -------------------------------------------------------

pub struct LabelledValue {
    label: String,
    value: String,
}

impl LabelledValue {
    pub fn new(label: &str, value: &str, width: f64, m: &dyn TextMeasure) -> Self {
        let label = format!("{}:", label.trim_end_matches(':'));
        let label_w = m.text_width(&label, FontFace::Bold, 9.0) + 4.0;
        LabelledValue {
            value: fit_with_ellipsis(value, width - label_w, 9.0, FontFace::Regular, m),
            label,
        }
    }
}

impl Block for LabelledValue {
    fn height(&self) -> f64 {
        LABELLED_HEIGHT
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let x = s.frame.left;
        let baseline = top - 11.0;
        let label_w = s.width_of(&self.label, FontFace::Bold, 9.0);
        s.text(&self.label, x, baseline, FontFace::Bold, 9.0, INK);
        s.text(&self.value, x + label_w + 4.0, baseline, FontFace::Regular, 9.0, INK);
    }
}

/// Divider followed by small print; placed atomically.
pub struct Footnote {
    lines: Vec<String>,
}

impl Footnote {
    pub fn new(text: &str, width: f64, m: &dyn TextMeasure) -> Self {
        Footnote {
            lines: wrap_text(text, width, FOOTNOTE_SIZE, FontFace::Regular, m),
        }
    }
}

impl Block for Footnote {
    fn height(&self) -> f64 {
        8.0 + self.lines.len() as f64 * line_height(FOOTNOTE_SIZE) + 4.0
    }

    fn render(&self, s: &mut Sketch<'_>, top: f64) {
        let f = s.frame;
        s.hrule(f.left, f.right(), top - 4.0, Stroke::new(RULE, 0.5));
        let mut line_top = top - 8.0;
        for line in &self.lines {
            s.text(line, f.left, line_top - ascent(FOOTNOTE_SIZE), FontFace::Regular, FOOTNOTE_SIZE, MUTED);
            line_top -= line_height(FOOTNOTE_SIZE);
        }
    }
}

/// Empty vertical space.
pub struct Spacer(pub f64);

impl Block for Spacer {
    fn height(&self) -> f64 {
        self.0.max(0.0)
    }

    fn render(&self, _s: &mut Sketch<'_>, _top: f64) {}
}
