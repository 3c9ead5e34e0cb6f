use crate::color::Color;
use crate::fonts::{FontFace, TextMeasure};

/// Line color and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Stroke { color, width }
    }
}

/// A single drawing primitive in page coordinates (origin bottom-left).
///
/// Layout produces these; a [`DrawingBackend`](crate::backend::DrawingBackend)
/// turns them into output.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `(x, y)` is the bottom-left corner.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Color,
    },
    /// `y` is the baseline.
    Text {
        text: String,
        x: f64,
        y: f64,
        face: FontFace,
        size: f64,
        color: Color,
    },
}

/// Horizontal extent a block draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub width: f64,
}

impl Frame {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Collects the draw operations for one block or one piece of chrome.
pub struct Sketch<'a> {
    pub frame: Frame,
    measure: &'a dyn TextMeasure,
    ops: Vec<DrawOp>,
}

impl<'a> Sketch<'a> {
    pub fn new(frame: Frame, measure: &'a dyn TextMeasure) -> Self {
        Sketch {
            frame,
            measure,
            ops: Vec::new(),
        }
    }

    pub fn measure(&self) -> &'a dyn TextMeasure {
        self.measure
    }

    pub fn width_of(&self, text: &str, face: FontFace, size: f64) -> f64 {
        self.measure.text_width(text, face, size)
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Color) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke: None,
        });
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: Stroke) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(stroke),
        });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
        });
    }

    /// Horizontal rule across `[x1, x2]` at `y`.
    pub fn hrule(&mut self, x1: f64, x2: f64, y: f64, stroke: Stroke) {
        self.line(x1, y, x2, y, stroke);
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: Color) {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
        });
    }

    pub fn text(&mut self, text: &str, x: f64, y: f64, face: FontFace, size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            face,
            size,
            color,
        });
    }

    /// Text whose right edge sits at `right`.
    pub fn text_right(&mut self, text: &str, right: f64, y: f64, face: FontFace, size: f64, color: Color) {
        let w = self.width_of(text, face, size);
        self.text(text, right - w, y, face, size, color);
    }

    /// Text centred on `center`.
    pub fn text_centered(&mut self, text: &str, center: f64, y: f64, face: FontFace, size: f64, color: Color) {
        let w = self.width_of(text, face, size);
        self.text(text, center - w / 2.0, y, face, size, color);
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}
