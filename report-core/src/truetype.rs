use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::objects::PdfObject;

/// A parsed TrueType face: metrics for layout plus the bookkeeping needed
/// to embed it as a Type0/CIDFontType2 font with Identity-H encoding.
pub struct TrueTypeFont {
    pub(crate) postscript_name: String,
    pub(crate) data: Vec<u8>,
    units_per_em: u16,
    pub(crate) ascent: i16,
    pub(crate) descent: i16,
    pub(crate) bbox: [i16; 4],
    pub(crate) cap_height: i16,
    pub(crate) italic_angle: f64,
    pub(crate) flags: u32,
    pub(crate) stem_v: i16,
    /// Unicode codepoint -> glyph id.
    cmap: BTreeMap<u32, u16>,
    /// Glyph id -> first codepoint mapping to it.
    reverse_cmap: BTreeMap<u16, u32>,
    /// Advance widths indexed by glyph id, in font units.
    advances: Vec<u16>,
    used: BTreeSet<u16>,
}

impl TrueTypeFont {
    /// Parse raw `.ttf` bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::FontParse(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(Error::FontParse("units per em is zero".to_string()));
        }
        let ascent = face.ascender();
        let descent = face.descender();
        let bb = face.global_bounding_box();

        let mut cmap = BTreeMap::new();
        let mut reverse_cmap = BTreeMap::new();
        let tables = face
            .tables()
            .cmap
            .ok_or_else(|| Error::FontParse("font has no cmap table".to_string()))?;
        for subtable in tables.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(gid) = subtable.glyph_index(cp) {
                    cmap.insert(cp, gid.0);
                    reverse_cmap.entry(gid.0).or_insert(cp);
                }
            });
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0))
            .collect();

        let family = face_name(&face, ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| "Embedded".to_string());
        let postscript_name = face_name(&face, ttf_parser::name_id::POST_SCRIPT_NAME)
            .unwrap_or_else(|| family.replace(' ', ""));

        let weight = face.weight().to_number() as f64 / 1000.0;
        let mut flags = 32; // nonsymbolic
        if face.is_monospaced() {
            flags |= 1;
        }
        if face.is_italic() {
            flags |= 64;
        }
        let cap_height = face.capital_height().unwrap_or(ascent);
        let italic_angle = face.italic_angle() as f64;

        Ok(TrueTypeFont {
            postscript_name,
            units_per_em,
            ascent,
            descent,
            bbox: [bb.x_min, bb.y_min, bb.x_max, bb.y_max],
            cap_height,
            italic_angle,
            flags,
            stem_v: (10.0 + 220.0 * weight * weight) as i16,
            cmap,
            reverse_cmap,
            advances,
            used: BTreeSet::new(),
            data,
        })
    }

    fn glyph(&self, ch: char) -> u16 {
        self.cmap.get(&(ch as u32)).copied().unwrap_or(0)
    }

    /// Advance of a glyph in 1/1000 em.
    fn glyph_width(&self, gid: u16) -> u32 {
        let raw = self
            .advances
            .get(gid as usize)
            .or_else(|| self.advances.first())
            .copied()
            .unwrap_or(0);
        raw as u32 * 1000 / self.units_per_em as u32
    }

    /// Scale a font-unit value to 1/1000 em.
    pub(crate) fn scale(&self, value: i16) -> i64 {
        value as i64 * 1000 / self.units_per_em as i64
    }

    /// Width of `text` in points.
    pub fn measure_text(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| self.glyph_width(self.glyph(ch))).sum();
        units as f64 * size / 1000.0
    }

    /// Encode text as big-endian glyph ids (`<0048006C>`), recording every
    /// glyph so the widths and ToUnicode tables cover it.
    pub fn encode_hex(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = self.glyph(ch);
            self.used.insert(gid);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        hex
    }

    /// `/W` array grouping consecutive used glyph ids:
    /// `[first [w w ...] first [w ...]]`.
    pub fn widths_array(&self) -> Vec<PdfObject> {
        let mut out = Vec::new();
        let mut run: Vec<PdfObject> = Vec::new();
        let mut run_start = 0u16;
        let mut prev: Option<u16> = None;
        for &gid in &self.used {
            if prev.map_or(true, |p| p + 1 != gid) {
                if !run.is_empty() {
                    out.push(PdfObject::Integer(run_start as i64));
                    out.push(PdfObject::Array(std::mem::take(&mut run)));
                }
                run_start = gid;
            }
            run.push(PdfObject::Integer(self.glyph_width(gid) as i64));
            prev = Some(gid);
        }
        if !run.is_empty() {
            out.push(PdfObject::Integer(run_start as i64));
            out.push(PdfObject::Array(run));
        }
        out
    }

    /// ToUnicode CMap so viewers can extract and search the text.
    pub fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        let pairs: Vec<(u16, u32)> = self
            .used
            .iter()
            .filter_map(|gid| self.reverse_cmap.get(gid).map(|cp| (*gid, *cp)))
            .collect();
        // At most 100 entries per bfchar section.
        for chunk in pairs.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, cp) in chunk {
                cmap.push_str(&format!("<{:04X}> <{:04X}>\n", gid, cp));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap.into_bytes()
    }

    pub(crate) fn default_width(&self) -> i64 {
        self.glyph_width(0) as i64
    }
}

fn face_name(face: &ttf_parser::Face, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == id && name.is_unicode())
        .and_then(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = TrueTypeFont::from_bytes(b"not a font".to_vec()).err().unwrap();
        assert!(matches!(err, Error::FontParse(_)));
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert!(TrueTypeFont::from_bytes(Vec::new()).is_err());
    }
}
