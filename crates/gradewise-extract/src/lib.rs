//! gradewise-extract — Answer sheet text extraction.
//!
//! Implements the `TextExtractor` trait for PDF and plain-text answer sheets
//! and guards the core against empty documents.

pub mod pdf;
pub mod plain;

use std::path::Path;

use gradewise_core::error::GradingError;
use gradewise_core::model::AnswerDocument;
use gradewise_core::traits::TextExtractor;

pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;

/// Returns `true` if `path` has a `.pdf` extension (any case).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Pick an extractor based on the file extension.
pub fn extractor_for(path: &Path) -> Box<dyn TextExtractor> {
    if is_pdf(path) {
        Box::new(PdfExtractor)
    } else {
        Box::new(PlainTextExtractor)
    }
}

/// Extract `path` with the extractor matching its extension.
pub async fn load_answer_document(path: &Path) -> Result<AnswerDocument, GradingError> {
    let extractor = extractor_for(path);
    load_with(extractor.as_ref(), path).await
}

/// Extract `path` with `extractor`, rejecting documents without text.
pub async fn load_with(
    extractor: &dyn TextExtractor,
    path: &Path,
) -> Result<AnswerDocument, GradingError> {
    let text = extractor.extract(path).await;
    let document = AnswerDocument::new(path.display().to_string(), text);

    if document.is_blank() {
        tracing::warn!(
            extractor = extractor.name(),
            "no text extracted from {}",
            path.display()
        );
        return Err(GradingError::ExtractionFailure {
            document: document.source,
        });
    }

    tracing::debug!(
        extractor = extractor.name(),
        chars = document.text.len(),
        "extracted {}",
        path.display()
    );
    Ok(document)
}
