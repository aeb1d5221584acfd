//! Evaluation engine.
//!
//! Pairs model and student answers by question key, scores each pair with the
//! configured strategy and aggregates marks into a graded report. Evaluation
//! is pure: identical inputs and configuration give identical reports.

use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::AnswerSet;
use crate::parser;
use crate::report::{EvaluationReport, Grade, QuestionResult};
use crate::scoring::ScoringStrategy;

/// Configuration for the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Weight of a question whose label carries no `(N Marks)` annotation.
    #[serde(default = "default_marks")]
    pub default_marks_per_question: f64,
    /// Similarity measure applied to every question in a run.
    #[serde(default)]
    pub scoring_strategy: ScoringStrategy,
}

fn default_marks() -> f64 {
    10.0
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_marks_per_question: default_marks(),
            scoring_strategy: ScoringStrategy::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn new(default_marks_per_question: f64, scoring_strategy: ScoringStrategy) -> Self {
        Self {
            default_marks_per_question,
            scoring_strategy,
        }
    }

    /// Check the configuration contract.
    pub fn validate(&self) -> Result<(), GradingError> {
        let marks = self.default_marks_per_question;
        if !marks.is_finite() || marks < 0.0 {
            return Err(GradingError::InvalidConfig(format!(
                "default_marks_per_question must be a non-negative number, got {marks}"
            )));
        }
        Ok(())
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round `raw` to two decimals without exceeding `max`.
///
/// Marks with more than two decimals (e.g. `2.345`) would otherwise round
/// above the question's maximum; those are truncated instead.
fn round_score(raw: f64, max: f64) -> f64 {
    let rounded = round2(raw);
    if rounded > max {
        (raw * 100.0).floor() / 100.0
    } else {
        rounded
    }
}

/// Grades student answer sets against a model answer set.
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    /// Create an evaluator, rejecting an invalid configuration up front.
    pub fn new(config: EvaluationConfig) -> Result<Self, GradingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate `student` against `model`.
    ///
    /// Every model question yields one result, in model order. Student
    /// questions absent from the model are ignored. An empty model set gives
    /// an empty report with a `Fail` grade.
    pub fn evaluate(&self, model: &AnswerSet, student: &AnswerSet) -> EvaluationReport {
        let strategy = self.config.scoring_strategy;
        let mut per_question = Vec::with_capacity(model.len());
        let mut raw_total = 0.0;

        for entry in model {
            let max_marks = entry
                .marks
                .unwrap_or(self.config.default_marks_per_question);

            let result = match student.get(entry.key.as_str()) {
                Some(answer) => {
                    let similarity = strategy.score(&answer.text, &entry.text);
                    let raw = (similarity * max_marks).min(max_marks).max(0.0);
                    raw_total += raw;
                    let score = round_score(raw, max_marks);
                    tracing::debug!(
                        question = %entry.key,
                        similarity,
                        score,
                        max_marks,
                        "scored answer"
                    );
                    QuestionResult {
                        key: entry.key.clone(),
                        score,
                        max_marks,
                        answered: true,
                    }
                }
                None => {
                    tracing::debug!(question = %entry.key, "question not answered");
                    QuestionResult {
                        key: entry.key.clone(),
                        score: 0.0,
                        max_marks,
                        answered: false,
                    }
                }
            };
            per_question.push(result);
        }

        let total_score = round2(per_question.iter().map(|q| q.score).sum());
        let total_possible: f64 = per_question.iter().map(|q| q.max_marks).sum();
        // From the unrounded scores, so per-question rounding cannot push a
        // perfect sheet past 100%.
        let percentage = if total_possible == 0.0 {
            0.0
        } else {
            round2((raw_total / total_possible * 100.0).clamp(0.0, 100.0))
        };

        if per_question.is_empty() {
            tracing::warn!("model answer set is empty; nothing to grade");
        }

        EvaluationReport {
            total_score,
            total_possible,
            percentage,
            grade: Grade::from_percentage(percentage),
            per_question,
        }
    }

    /// Segment both texts and evaluate them.
    pub fn evaluate_texts(&self, model_text: &str, student_text: &str) -> EvaluationReport {
        let model = parser::segment(model_text);
        let student = parser::segment(student_text);
        self.evaluate(&model, &student)
    }
}
