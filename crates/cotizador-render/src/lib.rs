//! # cotizador-render: Document Renderers
//!
//! Turns a composed [`Document`] into a file.
//!
//! ## Render Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Document (cotizador-core)   +   "Factura_Juan Perez.pdf"              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dyn DocumentRenderer ──┬── PdfRenderer  (printpdf, A4)                │
//! │       │                 └── HtmlRenderer (escaped, standalone page)    │
//! │       │                                                                 │
//! │       ├── AssetResolver: LOGO.jpg / FIRMA.jpg must exist               │
//! │       ├── output::sanitize_file_name                                   │
//! │       └── output::write_atomic (temp file + rename)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RenderedArtifact { path, format, bytes_written }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is one-shot and never retried here.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assets;
pub mod error;
pub mod html;
pub mod output;
pub mod pdf;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cotizador_core::Document;
use serde::{Deserialize, Serialize};

pub use assets::AssetResolver;
pub use error::{RenderError, RenderResult};
pub use html::HtmlRenderer;
pub use pdf::PdfRenderer;

// =============================================================================
// Renderer Trait
// =============================================================================

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Pdf,
    Html,
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Pdf => "pdf",
            RenderFormat::Html => "html",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(RenderFormat::Pdf),
            "html" | "htm" => Ok(RenderFormat::Html),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

/// A file produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub format: RenderFormat,
    pub bytes_written: u64,
}

/// Exports a document to a file.
///
/// `suggested_file_name` is the unsanitized `Factura_<client>.pdf` name;
/// implementations sanitize it and adjust the extension.
pub trait DocumentRenderer: Send + Sync {
    fn format(&self) -> RenderFormat;

    fn render(&self, document: &Document, suggested_file_name: &str) -> RenderResult<RenderedArtifact>;
}

/// Builds the renderer for `format`.
pub fn renderer_for(
    format: RenderFormat,
    asset_dir: &Path,
    output_dir: &Path,
) -> Box<dyn DocumentRenderer> {
    let assets = AssetResolver::new(asset_dir);
    match format {
        RenderFormat::Pdf => Box::new(PdfRenderer::new(assets, output_dir)),
        RenderFormat::Html => Box::new(HtmlRenderer::new(assets, output_dir)),
    }
}
