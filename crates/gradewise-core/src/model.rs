//! Core data model types for gradewise.
//!
//! Answer sheets are reduced to [`AnswerSet`]s keyed by [`QuestionKey`]; the
//! evaluation engine pairs model and student entries by key.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw extracted text plus the file or upload it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDocument {
    /// File path or upload identifier.
    pub source: String,
    /// Extracted plain text.
    pub text: String,
}

impl AnswerDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Returns `true` if the document carries no extractable content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Normalized question identifier such as `Q3`.
///
/// Matching is exact and case-sensitive; only surrounding whitespace is
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionKey(String);

impl QuestionKey {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionKey {
    fn from(label: &str) -> Self {
        QuestionKey::new(label)
    }
}

/// One question's answer text and optional mark weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub key: QuestionKey,
    /// Answer body with surrounding whitespace trimmed. May be empty.
    pub text: String,
    /// Explicit weight from a `(N Marks)` annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<f64>,
}

impl AnswerEntry {
    pub fn new(key: impl Into<QuestionKey>, text: impl Into<String>, marks: Option<f64>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            marks,
        }
    }
}

/// Insertion-ordered mapping from question key to answer entry.
///
/// Keys are unique. Inserting an existing key replaces its text and marks
/// (last occurrence wins) but keeps the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AnswerEntry>", into = "Vec<AnswerEntry>")]
pub struct AnswerSet {
    entries: Vec<AnswerEntry>,
    index: HashMap<String, usize>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the entry it replaced, if any.
    pub fn insert(&mut self, entry: AnswerEntry) -> Option<AnswerEntry> {
        match self.index.get(entry.key.as_str()) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], entry)),
            None => {
                self.index
                    .insert(entry.key.as_str().to_string(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnswerEntry> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in order of first appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, AnswerEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &QuestionKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Sum of explicit marks, using `default_marks` for unannotated entries.
    pub fn total_marks(&self, default_marks: f64) -> f64 {
        self.entries
            .iter()
            .map(|e| e.marks.unwrap_or(default_marks))
            .sum()
    }
}

impl From<Vec<AnswerEntry>> for AnswerSet {
    fn from(entries: Vec<AnswerEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<AnswerSet> for Vec<AnswerEntry> {
    fn from(set: AnswerSet) -> Self {
        set.entries
    }
}

impl FromIterator<AnswerEntry> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = AnswerEntry>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AnswerSet {
    type Item = &'a AnswerEntry;
    type IntoIter = std::slice::Iter<'a, AnswerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// How question labels are written in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `Q1 ...` with no mark annotations.
    Plain,
    /// `Q1(10 Marks) ...` with explicit weights.
    Weighted,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Plain => write!(f, "plain"),
            Dialect::Weighted => write!(f, "weighted"),
        }
    }
}

/// A stored model answer, as kept by a [`ModelAnswerRepository`].
///
/// [`ModelAnswerRepository`]: crate::traits::ModelAnswerRepository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAnswer {
    /// Unique upload identifier.
    pub id: Uuid,
    /// Assessment the model answer belongs to (e.g. "physics-midterm").
    pub name: String,
    /// File the text was extracted from.
    pub source: String,
    /// When the model answer was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// Raw extracted text.
    pub text: String,
    /// Segmented answers.
    pub answers: AnswerSet,
}

impl ModelAnswer {
    /// Build a fresh record from an extracted document and its answer set.
    pub fn new(name: impl Into<String>, document: AnswerDocument, answers: AnswerSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source: document.source,
            uploaded_at: Utc::now(),
            text: document.text,
            answers,
        }
    }
}
