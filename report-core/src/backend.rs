use tracing::debug;

use crate::color::Color;
use crate::draw::{DrawOp, Stroke};
use crate::error::{Error, Result};
use crate::fonts::{BuiltinFont, FontFace, LoadedFont, TextMeasure};
use crate::objects::{encode_literal, format_coord, ObjId, PdfObject};
use crate::truetype::TrueTypeFont;
use crate::writer::PdfWriter;

/// The drawing capability a session consumes: fonts, pages, primitives and
/// text measurement. Any implementation is substitutable for [`PdfBackend`].
pub trait DrawingBackend: TextMeasure + Send + 'static {
    /// Install the font used for `face`. Must precede the first page.
    fn embed_font(&mut self, face: FontFace, font: LoadedFont) -> Result<()>;

    /// Record a document metadata entry (e.g. "Title").
    fn set_info(&mut self, key: &str, value: &str);

    fn begin_page(&mut self, width: f64, height: f64) -> Result<()>;

    /// Draw on the open page.
    fn draw(&mut self, op: &DrawOp) -> Result<()>;

    fn end_page(&mut self) -> Result<()>;

    /// Serialize every closed page. Consumes the backend.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const REGULAR_FONT_OBJ: ObjId = ObjId(3, 0);
const BOLD_FONT_OBJ: ObjId = ObjId(4, 0);
const FIRST_FREE_OBJ: u32 = 5;

/// Bézier control distance for a quarter circle of radius 1.
const KAPPA: f64 = 0.552_284_749_831;

struct PageBuilder {
    width: f64,
    height: f64,
    content: Vec<u8>,
}

/// In-memory PDF 1.7 backend.
///
/// Pages are written to the buffer as soon as they are closed; fonts are
/// written last so embedded TrueType faces only carry the glyphs used.
pub struct PdfBackend {
    writer: PdfWriter<Vec<u8>>,
    regular: LoadedFont,
    bold: LoadedFont,
    info: Vec<(String, String)>,
    page_ids: Vec<ObjId>,
    current: Option<PageBuilder>,
    next_obj: u32,
}

impl PdfBackend {
    /// Start a document with builtin Helvetica faces.
    pub fn new() -> Result<Self> {
        let mut writer = PdfWriter::new(Vec::new());
        writer.write_header()?;
        Ok(PdfBackend {
            writer,
            regular: LoadedFont::Builtin(BuiltinFont::Helvetica),
            bold: LoadedFont::Builtin(BuiltinFont::HelveticaBold),
            info: Vec::new(),
            page_ids: Vec::new(),
            current: None,
            next_obj: FIRST_FREE_OBJ,
        })
    }

    fn alloc(&mut self) -> ObjId {
        let id = ObjId(self.next_obj, 0);
        self.next_obj += 1;
        id
    }

    fn font_mut(&mut self, face: FontFace) -> &mut LoadedFont {
        match face {
            FontFace::Regular => &mut self.regular,
            FontFace::Bold => &mut self.bold,
        }
    }

    fn page(&mut self) -> Result<&mut PageBuilder> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::Backend("no open page".to_string()))
    }

    fn write_font(&mut self, face: FontFace, id: ObjId) -> Result<()> {
        let font = std::mem::replace(
            self.font_mut(face),
            LoadedFont::Builtin(BuiltinFont::for_face(face)),
        );
        match font {
            LoadedFont::Builtin(builtin) => {
                let dict = PdfObject::dict(vec![
                    ("Type", PdfObject::name("Font")),
                    ("Subtype", PdfObject::name("Type1")),
                    ("BaseFont", PdfObject::name(builtin.pdf_base_name())),
                    ("Encoding", PdfObject::name("WinAnsiEncoding")),
                ]);
                self.writer.write_object(id, &dict)?;
            }
            LoadedFont::TrueType(tt) => self.write_truetype(&tt, id)?,
        }
        Ok(())
    }

    /// Type0 font, CIDFontType2 descendant, descriptor, font file and
    /// ToUnicode map.
    fn write_truetype(&mut self, tt: &TrueTypeFont, id: ObjId) -> Result<()> {
        let cid_id = self.alloc();
        let descriptor_id = self.alloc();
        let file_id = self.alloc();
        let to_unicode_id = self.alloc();
        let base = tt.postscript_name.as_str();

        let type0 = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type0")),
            ("BaseFont", PdfObject::name(base)),
            ("Encoding", PdfObject::name("Identity-H")),
            ("DescendantFonts", PdfObject::Array(vec![PdfObject::Reference(cid_id)])),
            ("ToUnicode", PdfObject::Reference(to_unicode_id)),
        ]);
        let cid_font = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("CIDFontType2")),
            ("BaseFont", PdfObject::name(base)),
            (
                "CIDSystemInfo",
                PdfObject::dict(vec![
                    ("Registry", PdfObject::string("Adobe")),
                    ("Ordering", PdfObject::string("Identity")),
                    ("Supplement", PdfObject::Integer(0)),
                ]),
            ),
            ("FontDescriptor", PdfObject::Reference(descriptor_id)),
            ("DW", PdfObject::Integer(tt.default_width())),
            ("W", PdfObject::Array(tt.widths_array())),
            ("CIDToGIDMap", PdfObject::name("Identity")),
        ]);
        let [x0, y0, x1, y1] = tt.bbox;
        let descriptor = PdfObject::dict(vec![
            ("Type", PdfObject::name("FontDescriptor")),
            ("FontName", PdfObject::name(base)),
            ("Flags", PdfObject::Integer(tt.flags as i64)),
            (
                "FontBBox",
                PdfObject::Array(vec![
                    PdfObject::Integer(tt.scale(x0)),
                    PdfObject::Integer(tt.scale(y0)),
                    PdfObject::Integer(tt.scale(x1)),
                    PdfObject::Integer(tt.scale(y1)),
                ]),
            ),
            ("ItalicAngle", PdfObject::Real(tt.italic_angle)),
            ("Ascent", PdfObject::Integer(tt.scale(tt.ascent))),
            ("Descent", PdfObject::Integer(tt.scale(tt.descent))),
            ("CapHeight", PdfObject::Integer(tt.scale(tt.cap_height))),
            ("StemV", PdfObject::Integer(tt.stem_v as i64)),
            ("FontFile2", PdfObject::Reference(file_id)),
        ]);
        let file = PdfObject::stream(
            vec![("Length1", PdfObject::Integer(tt.data.len() as i64))],
            tt.data.clone(),
        );
        let to_unicode = PdfObject::stream(vec![], tt.to_unicode_cmap());

        self.writer.write_object(id, &type0)?;
        self.writer.write_object(cid_id, &cid_font)?;
        self.writer.write_object(descriptor_id, &descriptor)?;
        self.writer.write_object(file_id, &file)?;
        self.writer.write_object(to_unicode_id, &to_unicode)?;
        Ok(())
    }
}

impl TextMeasure for PdfBackend {
    fn text_width(&self, text: &str, face: FontFace, size: f64) -> f64 {
        match face {
            FontFace::Regular => self.regular.measure(text, size),
            FontFace::Bold => self.bold.measure(text, size),
        }
    }
}

impl DrawingBackend for PdfBackend {
    fn embed_font(&mut self, face: FontFace, font: LoadedFont) -> Result<()> {
        if !self.page_ids.is_empty() || self.current.is_some() {
            return Err(Error::Backend(
                "fonts must be embedded before the first page".to_string(),
            ));
        }
        *self.font_mut(face) = font;
        Ok(())
    }

    fn set_info(&mut self, key: &str, value: &str) {
        self.info.push((key.to_string(), value.to_string()));
    }

    fn begin_page(&mut self, width: f64, height: f64) -> Result<()> {
        if self.current.is_some() {
            self.end_page()?;
        }
        self.current = Some(PageBuilder {
            width,
            height,
            content: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, op: &DrawOp) -> Result<()> {
        let mut ops = Vec::new();
        ops.extend_from_slice(b"q\n");
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    push_fill_color(&mut ops, *fill);
                }
                if let Some(stroke) = stroke {
                    push_stroke(&mut ops, *stroke);
                }
                ops.extend_from_slice(
                    format!(
                        "{} {} {} {} re\n",
                        format_coord(*x),
                        format_coord(*y),
                        format_coord(*width),
                        format_coord(*height),
                    )
                    .as_bytes(),
                );
                let paint: &[u8] = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => b"B\n",
                    (true, false) => b"f\n",
                    (false, true) => b"S\n",
                    (false, false) => b"n\n",
                };
                ops.extend_from_slice(paint);
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                push_stroke(&mut ops, *stroke);
                ops.extend_from_slice(
                    format!(
                        "{} {} m\n{} {} l\nS\n",
                        format_coord(*x1),
                        format_coord(*y1),
                        format_coord(*x2),
                        format_coord(*y2),
                    )
                    .as_bytes(),
                );
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                fill,
            } => {
                push_fill_color(&mut ops, *fill);
                push_circle_path(&mut ops, *cx, *cy, *radius);
                ops.extend_from_slice(b"f\n");
            }
            DrawOp::Text {
                text,
                x,
                y,
                face,
                size,
                color,
            } => {
                ops.extend_from_slice(b"BT\n");
                push_fill_color(&mut ops, *color);
                ops.extend_from_slice(
                    format!(
                        "/{} {} Tf\n{} {} Td\n",
                        face.pdf_name(),
                        format_coord(*size),
                        format_coord(*x),
                        format_coord(*y),
                    )
                    .as_bytes(),
                );
                match self.font_mut(*face) {
                    LoadedFont::Builtin(_) => {
                        ops.push(b'(');
                        ops.extend_from_slice(&encode_literal(text));
                        ops.extend_from_slice(b") Tj\n");
                    }
                    LoadedFont::TrueType(tt) => {
                        ops.extend_from_slice(tt.encode_hex(text).as_bytes());
                        ops.extend_from_slice(b" Tj\n");
                    }
                }
                ops.extend_from_slice(b"ET\n");
            }
        }
        ops.extend_from_slice(b"Q\n");
        self.page()?.content.extend_from_slice(&ops);
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let page = self
            .current
            .take()
            .ok_or_else(|| Error::Backend("end_page with no open page".to_string()))?;
        let content_id = self.alloc();
        let page_id = self.alloc();

        self.writer
            .write_object(content_id, &PdfObject::stream(vec![], page.content))?;
        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            ("MediaBox", PdfObject::rect(0.0, 0.0, page.width, page.height)),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![(
                    "Font",
                    PdfObject::dict(vec![
                        (FontFace::Regular.pdf_name(), PdfObject::Reference(REGULAR_FONT_OBJ)),
                        (FontFace::Bold.pdf_name(), PdfObject::Reference(BOLD_FONT_OBJ)),
                    ]),
                )]),
            ),
        ]);
        self.writer.write_object(page_id, &page_dict)?;
        self.page_ids.push(page_id);
        debug!(page = self.page_ids.len(), "flushed page");
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.current.is_some() {
            self.end_page()?;
        }
        self.write_font(FontFace::Regular, REGULAR_FONT_OBJ)?;
        self.write_font(FontFace::Bold, BOLD_FONT_OBJ)?;

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self.page_ids.iter().map(|id| PdfObject::Reference(*id)).collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;
        self.writer.write_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

fn push_fill_color(ops: &mut Vec<u8>, c: Color) {
    ops.extend_from_slice(
        format!("{} {} {} rg\n", format_coord(c.r), format_coord(c.g), format_coord(c.b)).as_bytes(),
    );
}

fn push_stroke(ops: &mut Vec<u8>, s: Stroke) {
    ops.extend_from_slice(
        format!(
            "{} {} {} RG\n{} w\n",
            format_coord(s.color.r),
            format_coord(s.color.g),
            format_coord(s.color.b),
            format_coord(s.width),
        )
        .as_bytes(),
    );
}

/// Four cubic arcs, counter-clockwise from the rightmost point.
fn push_circle_path(ops: &mut Vec<u8>, cx: f64, cy: f64, r: f64) {
    let k = r * KAPPA;
    let c = format_coord;
    let path = format!(
        "{} {} m\n\
         {} {} {} {} {} {} c\n\
         {} {} {} {} {} {} c\n\
         {} {} {} {} {} {} c\n\
         {} {} {} {} {} {} c\n",
        c(cx + r), c(cy),
        c(cx + r), c(cy + k), c(cx + k), c(cy + r), c(cx), c(cy + r),
        c(cx - k), c(cy + r), c(cx - r), c(cy + k), c(cx - r), c(cy),
        c(cx - r), c(cy - k), c(cx - k), c(cy - r), c(cx), c(cy - r),
        c(cx + k), c(cy - r), c(cx + r), c(cy - k), c(cx + r), c(cy),
    );
    ops.extend_from_slice(path.as_bytes());
}
