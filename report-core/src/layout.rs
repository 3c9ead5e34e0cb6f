use crate::draw::Sketch;
use crate::geometry::PageGeometry;

/// Slack for accumulated floating-point error when a block lands exactly
/// on the content bottom.
const EPSILON: f64 = 1e-6;

/// A unit of content placed with a single space check.
///
/// Atomic content (a table row, a bordered box, a signature row) is one
/// block and is never split across pages. Flowing text is one block per
/// line, so it may break between lines but never inside one.
pub trait Block {
    /// Vertical space the block consumes, in points.
    fn height(&self) -> f64;

    /// Draw the block with its top edge at `top`.
    fn render(&self, sketch: &mut Sketch<'_>, top: f64);
}

/// What the space check decided before a block is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The block fits on the current page.
    Fits,
    /// Close this page and continue on a fresh one.
    BreakFirst,
    /// Taller than a whole content area and already at the top: draw it
    /// here, overflowing the bottom bound.
    Oversized,
}

/// Running vertical cursor and page counter.
///
/// Pure arithmetic: deciding that a page must break is separate from
/// drawing the chrome that a break requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    top: f64,
    bottom: f64,
    y: f64,
    page: u32,
}

impl Flow {
    /// Cursor at the top of page 1.
    pub fn new(geometry: &PageGeometry) -> Self {
        Flow {
            top: geometry.content_top(),
            bottom: geometry.content_bottom(),
            y: geometry.content_top(),
            page: 1,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// 1-based number of the page being filled.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn capacity(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn remaining(&self) -> f64 {
        self.y - self.bottom
    }

    pub fn at_top(&self) -> bool {
        (self.top - self.y).abs() <= EPSILON
    }

    /// Whether `needed` points fit above the content bottom.
    pub fn fits(&self, needed: f64) -> bool {
        self.y - needed >= self.bottom - EPSILON
    }

    /// Move the cursor down. Never passes the content bottom, so an
    /// oversized block leaves the cursor at the bottom and the next block
    /// breaks the page.
    pub fn advance(&mut self, height: f64) {
        self.y = (self.y - height).max(self.bottom);
    }

    /// Decide how a block of `needed` points is placed.
    pub fn place(&self, needed: f64) -> Placement {
        if self.fits(needed) {
            Placement::Fits
        } else if self.at_top() {
            Placement::Oversized
        } else {
            Placement::BreakFirst
        }
    }

    /// Move to the top of the next page.
    pub fn start_page(&mut self) {
        self.page += 1;
        self.y = self.top;
    }
}
