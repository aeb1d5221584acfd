//! Collaborator traits for text extraction and model-answer storage.
//!
//! These are implemented by the `gradewise-extract` and `gradewise-store`
//! crates respectively. The evaluation engine itself never calls them; the
//! caller resolves documents and model answers first and hands the core
//! plain text or answer sets.

use std::path::Path;

use async_trait::async_trait;

use crate::model::ModelAnswer;

// ---------------------------------------------------------------------------
// Text extraction
// ---------------------------------------------------------------------------

/// Converts an answer-sheet file into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Human-readable extractor name (e.g. "pdf").
    fn name(&self) -> &str;

    /// Extract the document's text, pages concatenated in order.
    ///
    /// Unreadable or corrupt input yields an empty string, never an error.
    async fn extract(&self, path: &Path) -> String;
}

// ---------------------------------------------------------------------------
// Model-answer storage
// ---------------------------------------------------------------------------

/// Holds the current model answer for each assessment.
///
/// Setting a model answer replaces the previous one for the same name.
pub trait ModelAnswerRepository: Send + Sync {
    /// The latest model answer uploaded under `name`.
    fn get_current_model(&self, name: &str) -> anyhow::Result<Option<ModelAnswer>>;

    /// Store `answer` as the current model answer for `answer.name`.
    fn set_current_model(&self, answer: ModelAnswer) -> anyhow::Result<()>;

    /// All current model answers, sorted by name.
    fn list_models(&self) -> anyhow::Result<Vec<ModelAnswer>>;
}
