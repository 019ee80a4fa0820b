//! # Asset Resolution
//!
//! Image references in a document are relative paths (`LOGO.jpg`). The
//! resolver anchors them in the configured asset directory and refuses
//! anything that is not an existing file.

use std::path::{Path, PathBuf};

use cotizador_core::ImageRef;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Kind of an embeddable image, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }
}

/// An image found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub kind: ImageKind,
}

impl ResolvedAsset {
    /// Reads the file contents.
    pub fn read(&self) -> RenderResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| RenderError::io(&self.path, e))
    }
}

/// Looks up image references under a base directory.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    base_dir: PathBuf,
}

impl AssetResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        AssetResolver {
            base_dir: base_dir.into(),
        }
    }

    /// Resolves a reference to an existing JPEG or PNG file.
    ///
    /// A leading `/` is ignored, so `/LOGO.jpg` and `LOGO.jpg` name the same
    /// asset.
    pub fn resolve(&self, image: &ImageRef) -> RenderResult<ResolvedAsset> {
        let relative = image.path.trim_start_matches('/');
        let path = self.base_dir.join(relative);

        if !path.is_file() {
            return Err(RenderError::MissingAsset { path });
        }

        let kind = ImageKind::from_path(&path).ok_or_else(|| RenderError::InvalidImage {
            path: path.clone(),
            message: "only JPEG and PNG images are supported".to_string(),
        })?;

        debug!(path = %path.display(), "Resolved asset");
        Ok(ResolvedAsset { path, kind })
    }
}
