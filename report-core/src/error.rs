use std::io;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or serializing a report.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a font file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A TrueType font could not be parsed.
    #[error("font parsing failed: {0}")]
    FontParse(String),

    /// The page geometry leaves no usable content area.
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// A status colour key outside the fixed palette.
    #[error("unknown status colour: {0}")]
    UnknownStatus(String),

    /// A configuration document could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The blocking serialization task did not complete.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The drawing backend rejected an operation.
    #[error("backend error: {0}")]
    Backend(String),
}
