//! PDF text extraction via `lopdf`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use lopdf::Document;

use gradewise_core::traits::TextExtractor;

/// Extracts the text layer of a PDF, one page after another.
///
/// Scanned (image-only) pages have no text layer and contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn extract(&self, path: &Path) -> String {
        let owned: PathBuf = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || extract_pdf_text(&owned)).await;

        match result {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!("unreadable PDF {}: {e:#}", path.display());
                String::new()
            }
            Err(e) => {
                tracing::warn!("PDF extraction task failed for {}: {e}", path.display());
                String::new()
            }
        }
    }
}

/// Load `path` and concatenate the text of every page in page order.
///
/// Pages whose text cannot be decoded are skipped with a warning.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)
        .with_context(|| format!("failed to load PDF: {}", path.display()))?;

    if doc.is_encrypted() {
        anyhow::bail!("PDF is encrypted: {}", path.display());
    }

    let mut text = String::new();
    for (page_num, _page_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !page_text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(e) => {
                tracing::warn!(page = page_num, "skipping page of {}: {e}", path.display());
            }
        }
    }

    Ok(text)
}
