//! Evaluation report types with JSON persistence and markdown rendering.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::QuestionKey;

/// Letter grade derived from the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    Fail,
}

impl Grade {
    /// Map a percentage onto a grade; lower bounds are inclusive.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            Grade::A
        } else if percentage >= 60.0 {
            Grade::B
        } else if percentage >= 40.0 {
            Grade::C
        } else {
            Grade::Fail
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::Fail => write!(f, "Fail"),
        }
    }
}

/// Outcome for a single model-answer question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub key: QuestionKey,
    /// Awarded marks, rounded to two decimals.
    pub score: f64,
    pub max_marks: f64,
    /// Whether the student sheet had this label at all.
    pub answered: bool,
}

/// A complete graded evaluation of one student sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total_score: f64,
    pub total_possible: f64,
    pub percentage: f64,
    pub grade: Grade,
    /// Results in model-answer order.
    pub per_question: Vec<QuestionResult>,
}

impl EvaluationReport {
    /// `false` when the model answer had no recognizable questions, which
    /// callers should surface as a setup problem rather than a zero score.
    pub fn has_model_questions(&self) -> bool {
        !self.per_question.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.per_question.iter().filter(|q| q.answered).count()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {:.2} / {:.2} ({:.2}%) | **Grade:** {}\n\n",
            self.total_score, self.total_possible, self.percentage, self.grade
        ));

        if self.per_question.is_empty() {
            md.push_str("_No questions found in the model answer._\n");
            return md;
        }

        md.push_str("| Question | Score | Max | Answered |\n");
        md.push_str("|----------|-------|-----|----------|\n");
        for q in &self.per_question {
            md.push_str(&format!(
                "| {} | {:.2} | {:.2} | {} |\n",
                q.key,
                q.score,
                q.max_marks,
                if q.answered { "yes" } else { "no" }
            ));
        }

        md
    }
}
