use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::objects::{ObjId, PdfObject};

/// Low-level PDF serializer. Writes indirect objects to any `Write`
/// target while tracking byte offsets for the cross-reference table.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    offsets: BTreeMap<u32, usize>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            offsets: BTreeMap::new(),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    /// `%PDF-1.7` plus a comment of four high bytes so transfer tools
    /// treat the file as binary.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n")
    }

    /// Write `id` as an indirect object and remember where it starts.
    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) -> io::Result<()> {
        self.offsets.insert(id.0, self.offset);
        let mut buf = format!("{} {} obj\n", id.0, id.1).into_bytes();
        obj.write_to(&mut buf);
        buf.extend_from_slice(b"\nendobj\n");
        self.write_bytes(&buf)
    }

    /// Cross-reference table, trailer, `startxref` and `%%EOF`.
    ///
    /// Object numbers never written become free entries so the table
    /// stays contiguous from 0.
    pub fn write_trailer(&mut self, root: ObjId, info: Option<ObjId>) -> io::Result<()> {
        let xref_offset = self.offset;
        let size = self.offsets.keys().next_back().map_or(1, |max| max + 1);

        let mut table = format!("xref\n0 {}\n", size).into_bytes();
        // Every entry is exactly 20 bytes including the CRLF.
        table.extend_from_slice(b"0000000000 65535 f\r\n");
        for num in 1..size {
            match self.offsets.get(&num) {
                Some(off) => table.extend_from_slice(format!("{:010} 00000 n\r\n", off).as_bytes()),
                None => table.extend_from_slice(b"0000000000 00000 f\r\n"),
            }
        }

        let mut trailer = format!("trailer\n<< /Size {} /Root {} {} R", size, root.0, root.1);
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {} {} R", info.0, info.1));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset));
        table.extend_from_slice(trailer.as_bytes());

        self.write_bytes(&table)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
