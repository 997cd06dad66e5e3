//! Input resolution: read a user-supplied path into PDF bytes.
//!
//! The `%PDF` magic check happens here, before any parser runs, so callers
//! get a precise error for a `.docx` renamed to `.pdf` instead of a parser
//! diagnostic.

use crate::error::ScreenError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The four bytes every PDF file starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Verify that `bytes` start with the PDF magic.
pub fn ensure_pdf_magic(bytes: &[u8]) -> Result<(), ScreenError> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(());
    }
    Err(ScreenError::NotAPdf {
        magic: bytes.iter().take(4).copied().collect(),
    })
}

/// Read a local PDF file, validating existence, permissions and magic bytes.
pub async fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, ScreenError> {
    let path: PathBuf = path.as_ref().to_path_buf();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScreenError::FileNotFound { path });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ScreenError::PermissionDenied { path });
        }
        Err(e) => {
            return Err(ScreenError::DocumentFormat {
                detail: format!("failed to read '{}': {e}", path.display()),
            });
        }
    };

    ensure_pdf_magic(&bytes)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
