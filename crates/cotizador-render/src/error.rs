//! # Render Errors
//!
//! A render error is raised after the quotation number was issued; the
//! caller reports it together with that number.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Logo or signature image not found in the asset directory.
    #[error("Asset not found: {}", path.display())]
    MissingAsset { path: PathBuf },

    /// Asset exists but could not be decoded.
    #[error("Could not decode image {}: {message}", path.display())]
    InvalidImage { path: PathBuf, message: String },

    /// Reading an asset or writing the artifact failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The output format name is not known.
    #[error("Unknown output format '{0}' (expected 'pdf' or 'html')")]
    UnknownFormat(String),
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
