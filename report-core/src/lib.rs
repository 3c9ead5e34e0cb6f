pub mod backend;
pub mod chrome;
pub mod color;
pub mod config;
pub mod content;
pub mod draw;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod layout;
pub mod objects;
pub mod session;
pub mod truetype;
pub mod wrap;
pub mod writer;

pub use backend::{DrawingBackend, PdfBackend};
pub use color::{Color, StatusColour};
pub use config::{BrandConfig, DocumentMeta, SessionConfig};
pub use content::{ChecklistItem, KeyValue, SignatureParty};
pub use draw::{DrawOp, Stroke};
pub use error::{Error, Result};
pub use fonts::{BuiltinFont, FontFace, FontSource, LoadedFont, TextMeasure};
pub use geometry::PageGeometry;
pub use layout::{Block, Flow, Placement};
pub use session::Session;
pub use wrap::{fit_with_ellipsis, wrap_text};
