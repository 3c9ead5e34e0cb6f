use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::objects::winansi_code;
use crate::truetype::TrueTypeFont;

/// The two faces every report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PDF resource name used in content streams.
    pub fn pdf_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

/// Width measurement capability. Wrapping, truncation and alignment only
/// ever see this trait, never a concrete font.
pub trait TextMeasure {
    /// Width of `text` in points when set in `face` at `size`.
    fn text_width(&self, text: &str, face: FontFace, size: f64) -> f64;
}

/// Standard PDF fonts that need no embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    /// Default builtin for a face.
    pub fn for_face(face: FontFace) -> Self {
        match face {
            FontFace::Regular => BuiltinFont::Helvetica,
            FontFace::Bold => BuiltinFont::HelveticaBold,
        }
    }

    /// PDF BaseFont name.
    pub fn pdf_base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Width of a character in 1/1000 em, as drawn with WinAnsiEncoding.
    /// Characters the encoding lacks are drawn as `?` and measured as such.
    pub fn char_width(self, ch: char) -> u16 {
        let code = winansi_code(ch).unwrap_or(b'?') as usize;
        let (ascii, high) = match self {
            BuiltinFont::Helvetica => (&HELVETICA_WIDTHS, &HELVETICA_HIGH_WIDTHS),
            BuiltinFont::HelveticaBold => (&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_HIGH_WIDTHS),
        };
        match code {
            32..=126 => ascii[code - 32],
            128..=255 => high[code - 128],
            _ => ascii[(b'?' - 32) as usize],
        }
    }

    /// Width of `text` in points.
    pub fn measure(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| self.char_width(ch) as u32).sum();
        units as f64 * size / 1000.0
    }
}

/// Where a face's glyphs come from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSource {
    /// Helvetica / Helvetica-Bold.
    #[default]
    Builtin,
    /// A `.ttf` file read at session creation.
    File(PathBuf),
    /// Raw `.ttf` bytes.
    #[serde(skip)]
    Bytes(Vec<u8>),
}

/// A face ready for embedding.
pub enum LoadedFont {
    Builtin(BuiltinFont),
    TrueType(Box<TrueTypeFont>),
}

impl LoadedFont {
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        match self {
            LoadedFont::Builtin(b) => b.measure(text, size),
            LoadedFont::TrueType(tt) => tt.measure_text(text, size),
        }
    }
}

/// Resolve a source into a loaded face. File sources are read without
/// blocking the runtime.
pub async fn load_font(face: FontFace, source: &FontSource) -> Result<LoadedFont> {
    match source {
        FontSource::Builtin => Ok(LoadedFont::Builtin(BuiltinFont::for_face(face))),
        FontSource::File(path) => {
            let data = tokio::fs::read(path).await?;
            debug!(?face, path = %path.display(), bytes = data.len(), "read font file");
            Ok(LoadedFont::TrueType(Box::new(TrueTypeFont::from_bytes(data)?)))
        }
        FontSource::Bytes(data) => Ok(LoadedFont::TrueType(Box::new(
            TrueTypeFont::from_bytes(data.clone())?,
        ))),
    }
}

/// Helvetica, ASCII 32..=126, 1/1000 em. Adobe AFM data.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584,
    278, 333, 278, 278, 556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722,
    722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556,
    556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, ASCII 32..=126, 1/1000 em. Adobe AFM data.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584,
    278, 333, 278, 278, 556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722,
    722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611,
    611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica, WinAnsi 128..=255, 1/1000 em. Codes the encoding leaves
/// undefined are 0 and never looked up.
#[rustfmt::skip]
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333,
    1000, 0, 611, 0, 0, 222, 222, 333, 333, 350, 556, 1000,
    333, 1000, 500, 333, 944, 0, 500, 667, 278, 333, 556, 556,
    556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556,
    834, 834, 834, 611, 667, 667, 667, 667, 667, 667, 1000, 722,
    667, 667, 667, 667, 278, 278, 278, 278, 722, 722, 778, 778,
    778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556,
    278, 278, 278, 278, 556, 556, 556, 556, 556, 556, 556, 584,
    611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold, WinAnsi 128..=255, 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333,
    1000, 0, 611, 0, 0, 278, 278, 500, 500, 350, 556, 1000,
    333, 1000, 556, 333, 944, 0, 500, 667, 278, 333, 556, 556,
    556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556,
    834, 834, 834, 611, 722, 722, 722, 722, 722, 722, 1000, 722,
    667, 667, 667, 667, 278, 278, 278, 278, 722, 722, 778, 778,
    778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556,
    278, 278, 278, 278, 611, 611, 611, 611, 611, 611, 611, 584,
    611, 611, 611, 611, 611, 556, 611, 556,
];
