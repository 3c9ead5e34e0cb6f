/// Object identifier: (object_number, generation_number).
/// Generation is always 0 for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32, pub u16);

/// PDF object types per PDF 32000-1:2008 Section 7.3.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string, stored unescaped.
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Vec keeps key order deterministic.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(own_keys(entries))
    }

    pub fn stream(entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: own_keys(entries),
            data,
        }
    }

    /// Rectangle array `[x0 y0 x1 y1]`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(x0),
            PdfObject::Real(y0),
            PdfObject::Real(x1),
            PdfObject::Real(y1),
        ])
    }

    /// Append the object's PDF syntax to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Null => out.extend_from_slice(b"null"),
            PdfObject::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
            PdfObject::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
            PdfObject::Real(f) => out.extend_from_slice(format_real(*f).as_bytes()),
            PdfObject::Name(name) => {
                out.push(b'/');
                out.extend_from_slice(name.as_bytes());
            }
            PdfObject::LiteralString(s) => {
                out.push(b'(');
                out.extend_from_slice(&encode_literal(s));
                out.push(b')');
            }
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(entries) => {
                write_dict(entries, None, out);
            }
            PdfObject::Stream { dict, data } => {
                write_dict(dict, Some(data.len()), out);
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            }
            PdfObject::Reference(id) => {
                out.extend_from_slice(format!("{} {} R", id.0, id.1).as_bytes());
            }
        }
    }
}

fn own_keys(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn write_dict(entries: &[(String, PdfObject)], length: Option<usize>, out: &mut Vec<u8>) {
    out.extend_from_slice(b"<<");
    for (key, val) in entries {
        out.extend_from_slice(b" /");
        out.extend_from_slice(key.as_bytes());
        out.push(b' ');
        val.write_to(out);
    }
    if let Some(len) = length {
        out.extend_from_slice(format!(" /Length {}", len).as_bytes());
    }
    out.extend_from_slice(b" >>");
}

/// Encode text for a literal string shown with a WinAnsi builtin font.
///
/// `\`, `(` and `)` are escaped; non-ASCII characters with a WinAnsi code
/// are written as octal escapes; anything else becomes `?`.
pub fn encode_literal(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.extend_from_slice(b"\\\\"),
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            ' '..='~' => out.push(ch as u8),
            _ => match winansi_code(ch) {
                Some(code) => out.extend_from_slice(format!("\\{:03o}", code).as_bytes()),
                None => out.push(b'?'),
            },
        }
    }
    out
}

/// WinAnsiEncoding byte for `ch`, if the encoding has a glyph for it.
pub(crate) fn winansi_code(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        'ƒ' => Some(0x83),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '†' => Some(0x86),
        '‡' => Some(0x87),
        'ˆ' => Some(0x88),
        '‰' => Some(0x89),
        'Š' => Some(0x8a),
        '‹' => Some(0x8b),
        'Œ' => Some(0x8c),
        'Ž' => Some(0x8e),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '˜' => Some(0x98),
        '™' => Some(0x99),
        'š' => Some(0x9a),
        '›' => Some(0x9b),
        'œ' => Some(0x9c),
        'ž' => Some(0x9e),
        'Ÿ' => Some(0x9f),
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        _ => None,
    }
}

/// Format a float for object syntax: fixed notation, no trailing zeros.
pub(crate) fn format_real(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a number for content-stream operators: integers without a
/// decimal point, otherwise up to four decimals.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}
