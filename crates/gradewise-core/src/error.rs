//! Grading error types.
//!
//! The segmenter and scorer never fail on malformed input; these errors cover
//! the conditions a caller must surface before or after an evaluation.

use thiserror::Error;

/// Errors that can occur around an evaluation run.
#[derive(Debug, Error)]
pub enum GradingError {
    /// Text extraction produced no usable content.
    #[error("no extractable text in {document}")]
    ExtractionFailure { document: String },

    /// The model answer contains no recognizable question labels.
    #[error("model answer contains no question labels (expected labels such as \"Q1\")")]
    NoModelQuestionsFound,

    /// No model answer has been uploaded for the assessment.
    #[error("no model answer found for '{name}'")]
    MissingModelAnswer { name: String },

    /// The evaluation configuration violates its contract.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GradingError {
    /// Returns `true` if the error points at a bad model answer or setup
    /// rather than at the student's submission.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GradingError::NoModelQuestionsFound
                | GradingError::MissingModelAnswer { .. }
                | GradingError::InvalidConfig(_)
        )
    }
}
