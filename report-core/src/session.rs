use tracing::{debug, info, instrument, warn};

use crate::backend::{DrawingBackend, PdfBackend};
use crate::chrome;
use crate::color::StatusColour;
use crate::config::{DocumentMeta, SessionConfig};
use crate::content::{
    badge_rows, column_widths, fit_widths, grid_rows, signature_rows, table_rows, Banner, ChecklistItem,
    ChecklistRow, Footnote, KeyValue, LabelledValue, SectionHeader, SignatureParty, Spacer,
    TextBox, TextLine,
};
use crate::draw::{DrawOp, Frame, Sketch};
use crate::error::Result;
use crate::fonts::{load_font, FontFace};
use crate::geometry::PageGeometry;
use crate::layout::{Block, Flow, Placement};

const PRODUCER: &str = concat!("report-core ", env!("CARGO_PKG_VERSION"));

/// One document being built.
///
/// Content operations append in call order; pages break automatically and
/// every page gets the same header and footer, differing only in the page
/// number. Call [`finalize`](Session::finalize) to get the bytes.
pub struct Session<B: DrawingBackend = PdfBackend> {
    backend: B,
    config: SessionConfig,
    meta: DocumentMeta,
    flow: Flow,
}

impl Session<PdfBackend> {
    /// Start a PDF with the default configuration, stamped with the
    /// current time.
    pub async fn create(
        title: &str,
        reference: &str,
        status_label: &str,
        status: StatusColour,
    ) -> Result<Self> {
        let meta = DocumentMeta::new(title, reference, status_label, status);
        Session::create_with(PdfBackend::new()?, SessionConfig::default(), meta).await
    }
}

impl<B: DrawingBackend> Session<B> {
    /// Start a document on `backend`: load fonts, record metadata and open
    /// page 1 with its header.
    #[instrument(skip_all, fields(title = %meta.title, reference = %meta.reference))]
    pub async fn create_with(mut backend: B, config: SessionConfig, meta: DocumentMeta) -> Result<Self> {
        config.geometry.validate()?;

        let regular = load_font(FontFace::Regular, &config.regular_font).await?;
        let bold = load_font(FontFace::Bold, &config.bold_font).await?;
        backend.embed_font(FontFace::Regular, regular)?;
        backend.embed_font(FontFace::Bold, bold)?;

        backend.set_info("Title", &meta.title);
        backend.set_info("Subject", &format!("Reference {}", meta.reference));
        backend.set_info("Creator", &config.brand.name);
        backend.set_info("Producer", PRODUCER);
        backend.set_info(
            "CreationDate",
            &meta.issued_at.format("D:%Y%m%d%H%M%S").to_string(),
        );

        let flow = Flow::new(&config.geometry);
        let mut session = Session {
            backend,
            config,
            meta,
            flow,
        };
        session.open_page()?;
        info!(status = %session.meta.status, "report session created");
        Ok(session)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.config.geometry
    }

    /// Pages opened so far, the current one included.
    pub fn page_count(&self) -> u32 {
        self.flow.page()
    }

    /// Vertical position where the next block will start.
    pub fn cursor_y(&self) -> f64 {
        self.flow.y()
    }

    // -------------------------------------------------------
    // Content operations
    // -------------------------------------------------------

    pub fn section(&mut self, title: &str) -> Result<()> {
        self.place(&SectionHeader::new(title))
    }

    /// Label/value cells in `cols` columns; each row moves to the next page
    /// as a whole.
    pub fn key_value_grid(&mut self, pairs: &[KeyValue], cols: usize) -> Result<()> {
        let rows = grid_rows(pairs, cols, self.content_width(), &self.backend);
        for row in &rows {
            self.place(row)?;
        }
        Ok(())
    }

    /// Wrapped body text. May break between lines.
    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        let lines = TextLine::paragraph(text, self.content_width(), &self.backend);
        for line in &lines {
            self.place(line)?;
        }
        Ok(())
    }

    /// Wrapped text inside a tinted box; never split.
    pub fn text_box(&mut self, text: &str, colour: StatusColour) -> Result<()> {
        let block = TextBox::new(text, colour, self.content_width(), &self.backend);
        self.place(&block)
    }

    pub fn warning_banner(&mut self, text: &str) -> Result<()> {
        let block = Banner::warning(text, self.content_width(), &self.backend);
        self.place(&block)
    }

    /// A table with a header row. `widths` are column widths in points;
    /// when their total exceeds the content width they are scaled down to
    /// fit. When absent (or of the wrong length) they are derived from the
    /// content and scaled to the content width.
    ///
    /// The header is repeated at the top of every continuation page and is
    /// never left alone at the bottom of a page.
    pub fn table<H, C>(&mut self, headers: &[H], rows: &[Vec<C>], widths: Option<&[f64]>) -> Result<()>
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().to_string()).collect())
            .collect();
        let total = self.content_width();
        let widths = match widths {
            Some(w) if w.len() == headers.len() && !w.is_empty() => {
                let fitted = fit_widths(w, total);
                if fitted != w {
                    debug!(given = w.iter().sum::<f64>(), total, "scaling column widths to content width");
                }
                fitted
            }
            other => {
                if let Some(w) = other {
                    warn!(given = w.len(), columns = headers.len(), "ignoring mismatched column widths");
                }
                column_widths(&headers, &rows, total, &self.backend)
            }
        };
        let (header, body) = table_rows(&headers, &rows, &widths, &self.backend);

        let first = body.first().map_or(0.0, |row| row.height());
        self.ensure_space(header.height() + first)?;
        self.draw_block(&header)?;
        for row in &body {
            if self.ensure_space(row.height())? == Placement::BreakFirst {
                self.draw_block(&header)?;
            }
            self.draw_block(row)?;
        }
        Ok(())
    }

    pub fn checklist(&mut self, items: &[ChecklistItem]) -> Result<()> {
        let width = self.content_width();
        for item in items {
            let row = ChecklistRow::new(item, width, &self.backend);
            self.place(&row)?;
        }
        Ok(())
    }

    pub fn badges<S: AsRef<str>>(&mut self, labels: &[S], colour: StatusColour) -> Result<()> {
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let rows = badge_rows(&labels, colour, self.content_width(), &self.backend);
        for row in &rows {
            self.place(row)?;
        }
        Ok(())
    }

    pub fn bullet_list<S: AsRef<str>>(&mut self, items: &[S]) -> Result<()> {
        let width = self.content_width();
        for item in items {
            let lines = TextLine::bullet_item(item.as_ref(), width, &self.backend);
            for line in &lines {
                self.place(line)?;
            }
        }
        Ok(())
    }

    /// Signature boxes, two per row.
    pub fn signature_block(&mut self, parties: &[SignatureParty]) -> Result<()> {
        for row in &signature_rows(parties) {
            self.place(row)?;
        }
        Ok(())
    }

    pub fn labelled_value(&mut self, label: &str, value: &str) -> Result<()> {
        let block = LabelledValue::new(label, value, self.content_width(), &self.backend);
        self.place(&block)
    }

    pub fn footnote(&mut self, text: &str) -> Result<()> {
        let block = Footnote::new(text, self.content_width(), &self.backend);
        self.place(&block)
    }

    /// Reserve empty vertical space.
    pub fn spacer(&mut self, height: f64) -> Result<()> {
        self.place(&Spacer(height))
    }

    /// Continue on a new page unless the cursor is already at the top.
    pub fn page_break(&mut self) -> Result<()> {
        if self.flow.at_top() {
            return Ok(());
        }
        self.break_page()
    }

    /// Draw the last footer, close the page and serialize.
    #[instrument(skip_all, fields(pages = self.flow.page()))]
    pub async fn finalize(mut self) -> Result<Vec<u8>> {
        self.close_page()?;
        let pages = self.flow.page();
        let backend = self.backend;
        let bytes = tokio::task::spawn_blocking(move || backend.finish()).await??;
        info!(pages, bytes = bytes.len(), "report finalized");
        Ok(bytes)
    }

    // -------------------------------------------------------
    // Pagination
    // -------------------------------------------------------

    fn content_width(&self) -> f64 {
        self.config.geometry.content_width()
    }

    fn frame(&self) -> Frame {
        Frame {
            left: self.config.geometry.margin_left,
            width: self.content_width(),
        }
    }

    /// One space check, then draw.
    fn place(&mut self, block: &dyn Block) -> Result<()> {
        self.ensure_space(block.height())?;
        self.draw_block(block)
    }

    /// Make room for `needed` points, breaking the page when the current
    /// one cannot hold them.
    fn ensure_space(&mut self, needed: f64) -> Result<Placement> {
        let placement = self.flow.place(needed);
        match placement {
            Placement::Fits => {}
            Placement::BreakFirst => {
                self.break_page()?;
                if self.flow.place(needed) == Placement::Oversized {
                    self.warn_oversized(needed);
                }
            }
            Placement::Oversized => self.warn_oversized(needed),
        }
        Ok(placement)
    }

    fn warn_oversized(&self, needed: f64) {
        warn!(
            page = self.flow.page(),
            needed,
            capacity = self.flow.capacity(),
            "block taller than the content area, drawing it overflowing"
        );
    }

    fn draw_block(&mut self, block: &dyn Block) -> Result<()> {
        let top = self.flow.y();
        let ops = collect_ops(&self.backend, self.frame(), |s| block.render(s, top));
        self.apply(&ops)?;
        self.flow.advance(block.height());
        Ok(())
    }

    fn break_page(&mut self) -> Result<()> {
        self.close_page()?;
        self.flow.start_page();
        debug!(page = self.flow.page(), "page break");
        self.open_page()
    }

    fn open_page(&mut self) -> Result<()> {
        let g = &self.config.geometry;
        self.backend.begin_page(g.page_width, g.page_height)?;
        let ops = collect_ops(&self.backend, self.frame(), |s| {
            chrome::render_header(s, &self.config.geometry, &self.config.brand, &self.meta)
        });
        self.apply(&ops)
    }

    fn close_page(&mut self) -> Result<()> {
        let page = self.flow.page();
        let ops = collect_ops(&self.backend, self.frame(), |s| {
            chrome::render_footer(s, &self.config.geometry, &self.config.brand, &self.meta, page)
        });
        self.apply(&ops)?;
        self.backend.end_page()
    }

    fn apply(&mut self, ops: &[DrawOp]) -> Result<()> {
        for op in ops {
            self.backend.draw(op)?;
        }
        Ok(())
    }
}

fn collect_ops<B: DrawingBackend>(backend: &B, frame: Frame, paint: impl FnOnce(&mut Sketch<'_>)) -> Vec<DrawOp> {
    let mut sketch = Sketch::new(frame, backend);
    paint(&mut sketch);
    sketch.into_ops()
}
