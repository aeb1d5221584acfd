//! gradewise-core — Question segmentation, answer similarity and grading.
//!
//! This crate turns raw answer-sheet text into per-question answer sets,
//! scores student answers against a model answer and aggregates the result
//! into a graded report. It performs no I/O of its own; text extraction and
//! model-answer persistence sit behind the traits in [`traits`].

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod traits;

pub use engine::{EvaluationConfig, Evaluator};
pub use error::GradingError;
pub use model::{AnswerDocument, AnswerEntry, AnswerSet, Dialect, ModelAnswer, QuestionKey};
pub use report::{EvaluationReport, Grade, QuestionResult};
pub use scoring::ScoringStrategy;
