//! Text extraction: PDF bytes → [`Document`].
//!
//! Each page is extracted on its own; the page text is trimmed and kept
//! only when something remains. Kept pages are joined with `\n` in page
//! order. No OCR, layout reconstruction or table detection is attempted.
//!
//! `pdf-extract` is CPU-bound and can panic on malformed input, so the
//! parse runs inside `tokio::task::spawn_blocking`; a panic comes back as a
//! `JoinError` and is reported as [`ScreenError::DocumentFormat`].

use crate::error::ScreenError;
use crate::model::Document;
use crate::pipeline::input::ensure_pdf_magic;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract the text of every page of `bytes` that has any.
///
/// # Errors
/// - [`ScreenError::NotAPdf`] when the bytes lack the `%PDF` magic.
/// - [`ScreenError::DocumentFormat`] when the PDF cannot be parsed.
///
/// A PDF whose pages carry no text is **not** an error here: the returned
/// document has empty text and [`Document::require_text`] reports it.
pub async fn extract_document(bytes: Vec<u8>) -> Result<Document, ScreenError> {
    ensure_pdf_magic(&bytes)?;

    let start = Instant::now();
    let (bytes, pages) = tokio::task::spawn_blocking(move || {
        let pages = extract_pages_blocking(&bytes);
        (bytes, pages)
    })
    .await
    .map_err(|e| {
        warn!("PDF parser task failed: {e}");
        ScreenError::DocumentFormat {
            detail: format!("PDF parser crashed on this file: {e}"),
        }
    })?;
    let pages = pages?;

    let document = assemble(bytes, &pages);
    info!(
        "Extracted {} chars from {}/{} pages in {:?}",
        document.text.len(),
        document.text_pages.len(),
        document.page_count,
        start.elapsed()
    );
    Ok(document)
}

/// Blocking per-page extraction.
fn extract_pages_blocking(bytes: &[u8]) -> Result<Vec<String>, ScreenError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        warn!("PDF parse failed: {e}");
        ScreenError::DocumentFormat {
            detail: format!("not a readable PDF: {e}"),
        }
    })
}

/// Join the non-empty page texts, remembering which pages contributed.
fn assemble(bytes: Vec<u8>, pages: &[String]) -> Document {
    let mut kept: Vec<&str> = Vec::with_capacity(pages.len());
    let mut text_pages = Vec::with_capacity(pages.len());

    for (idx, page) in pages.iter().enumerate() {
        let trimmed = page.trim();
        if trimmed.is_empty() {
            debug!("Page {} has no extractable text; skipped", idx + 1);
            continue;
        }
        kept.push(trimmed);
        text_pages.push(idx + 1);
    }

    Document {
        bytes,
        text: kept.join("\n"),
        page_count: pages.len(),
        text_pages,
    }
}
