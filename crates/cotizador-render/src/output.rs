//! # Artifact Output
//!
//! File naming and atomic writes.
//!
//! ```text
//! "Factura_Juan/Perez.pdf" ──sanitize──► "Factura_Juan_Perez.pdf"
//!                                              │
//!            <dir>/.tmpXXXX  ◄── write bytes ──┘
//!                 │
//!                 └── persist (rename) ──► <dir>/Factura_Juan_Perez.pdf
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Used when sanitizing leaves nothing.
pub const FALLBACK_FILE_STEM: &str = "Factura";

/// Makes a client-derived name safe to use as a single file name.
///
/// Letters and digits (any script), space, `-`, `_` and `.` are kept;
/// everything else becomes `_`. Leading dots are dropped so the result is
/// never hidden nor `..`.
pub fn sanitize_file_name(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|ch| {
            let ok = ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == ' ';
            if ok {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Replaces (or adds) the extension of a sanitized file name.
pub fn with_extension(file_name: &str, extension: &str) -> String {
    let stem = match Path::new(file_name).extension() {
        Some(ext) => &file_name[..file_name.len() - ext.len() - 1],
        None => file_name,
    };
    let stem = if stem.is_empty() { FALLBACK_FILE_STEM } else { stem };
    format!("{}.{}", stem, extension)
}

/// Final file name for a suggested name and target extension.
pub fn output_file_name(suggested: &str, extension: &str) -> String {
    with_extension(&sanitize_file_name(suggested), extension)
}

/// Writes `bytes` to `dir/file_name` through a temporary sibling.
///
/// Either the complete file appears or nothing changes.
pub fn write_atomic(dir: &Path, file_name: &str, bytes: &[u8]) -> RenderResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| RenderError::io(dir, e))?;

    let target = dir.join(file_name);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RenderError::io(dir, e))?;

    tmp.write_all(bytes).map_err(|e| RenderError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| RenderError::io(tmp.path(), e))?;

    tmp.persist(&target)
        .map_err(|e| RenderError::io(&target, e.error))?;

    debug!(path = %target.display(), bytes = bytes.len(), "Artifact written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Factura_Juan Perez.pdf"), "Factura_Juan Perez.pdf");
        assert_eq!(sanitize_file_name("Factura_José Núñez.pdf"), "Factura_José Núñez.pdf");
        assert_eq!(sanitize_file_name("Factura_a/b\\c.pdf"), "Factura_a_b_c.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("   "), "Factura");
        assert_eq!(sanitize_file_name("..."), "Factura");
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("Factura_Ana.pdf", "html"), "Factura_Ana.html");
        assert_eq!(with_extension("Factura_Ana", "pdf"), "Factura_Ana.pdf");
        assert_eq!(output_file_name("Factura_S.A.S.pdf", "html"), "Factura_S.A.S.html");
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let path = write_atomic(&out, "a.pdf", b"hello").unwrap();
        assert_eq!(path, out.join("a.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        // Overwrites, leaves no temp files behind.
        write_atomic(&out, "a.pdf", b"again").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"again");
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let err = write_atomic(&blocker.join("sub"), "a.pdf", b"x").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
