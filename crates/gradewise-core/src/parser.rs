//! Question segmenter.
//!
//! Splits raw answer-sheet text on `Q<digits>` labels with a single
//! left-to-right scan. A label may be followed by a mark annotation such as
//! `(10 Marks)`; whether annotations are parsed is decided once per document
//! by looking at the first label.

use std::collections::HashSet;

use crate::model::{AnswerEntry, AnswerSet, Dialect, QuestionKey};

/// One label occurrence and the text that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: QuestionKey,
    pub marks: Option<f64>,
    pub text: String,
    /// Byte offset of the label in the source text.
    pub offset: usize,
}

/// Every label occurrence of a document, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedDocument {
    pub dialect: Dialect,
    pub sections: Vec<Section>,
}

impl SegmentedDocument {
    /// Collapse the sections into an answer set (last duplicate wins).
    pub fn into_answer_set(self) -> AnswerSet {
        self.sections
            .into_iter()
            .map(|s| AnswerEntry {
                key: s.key,
                text: s.text,
                marks: s.marks,
            })
            .collect()
    }
}

/// Byte span of a `Q<digits>` label.
#[derive(Debug, Clone, Copy)]
struct Label {
    start: usize,
    end: usize,
}

/// Segment `text` into an answer set keyed by question label.
///
/// Returns an empty set when no labels are present.
pub fn segment(text: &str) -> AnswerSet {
    scan(text).into_answer_set()
}

/// Scan `text` for question labels and slice out each answer.
pub fn scan(text: &str) -> SegmentedDocument {
    let labels = find_labels(text);

    let dialect = match labels.first() {
        Some(first) if parse_mark_annotation(&text[first.end..]).is_some() => Dialect::Weighted,
        _ => Dialect::Plain,
    };

    let mut sections = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let body_end = labels.get(i + 1).map_or(text.len(), |next| next.start);

        let (marks, body_start) = match dialect {
            Dialect::Weighted => match parse_mark_annotation(&text[label.end..body_end]) {
                Some((marks, consumed)) => (Some(marks), label.end + consumed),
                None => (None, label.end),
            },
            Dialect::Plain => (None, label.end),
        };

        sections.push(Section {
            key: QuestionKey::new(&text[label.start..label.end]),
            marks,
            text: text[body_start..body_end].trim().to_string(),
            offset: label.start,
        });
    }

    tracing::debug!(
        labels = sections.len(),
        %dialect,
        "segmented answer sheet"
    );

    SegmentedDocument { dialect, sections }
}

/// Locate every `Q` immediately followed by one or more ASCII digits.
fn find_labels(text: &str) -> Vec<Label> {
    let bytes = text.as_bytes();
    let mut labels = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'Q' {
            let digits_end = skip_digits(bytes, i + 1);
            if digits_end > i + 1 {
                labels.push(Label {
                    start: i,
                    end: digits_end,
                });
                i = digits_end;
                continue;
            }
        }
        i += 1;
    }

    labels
}

/// Parse a leading `(<number> Marks)` annotation.
///
/// Returns the mark value and the number of bytes consumed, including any
/// whitespace before the opening parenthesis.
fn parse_mark_annotation(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();

    let mut i = skip_whitespace(bytes, 0);
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    i = skip_whitespace(bytes, i + 1);

    let number_start = i;
    i = skip_digits(bytes, i);
    if i == number_start {
        return None;
    }
    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        i = skip_digits(bytes, i + 1);
    }
    let marks: f64 = text[number_start..i].parse().ok()?;

    i = skip_whitespace(bytes, i);
    if !bytes.get(i..i + 4)?.eq_ignore_ascii_case(b"mark") {
        return None;
    }
    i += 4;
    if bytes.get(i).is_some_and(|b| b.eq_ignore_ascii_case(&b's')) {
        i += 1;
    }
    i = skip_whitespace(bytes, i);
    if bytes.get(i) != Some(&b')') {
        return None;
    }

    Some((marks, i + 1))
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// A warning from answer-sheet validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question the warning concerns (if applicable).
    pub key: Option<QuestionKey>,
    /// Warning message.
    pub message: String,
}

/// Check a segmented document for common authoring mistakes.
pub fn validate_segments(doc: &SegmentedDocument) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if doc.sections.is_empty() {
        warnings.push(ValidationWarning {
            key: None,
            message: "no question labels found (expected labels such as \"Q1\")".into(),
        });
        return warnings;
    }

    let mut seen = HashSet::new();
    for section in &doc.sections {
        if !seen.insert(&section.key) {
            warnings.push(ValidationWarning {
                key: Some(section.key.clone()),
                message: format!(
                    "duplicate label {}; the later answer replaces the earlier one",
                    section.key
                ),
            });
        }
    }

    for section in &doc.sections {
        if section.text.is_empty() {
            warnings.push(ValidationWarning {
                key: Some(section.key.clone()),
                message: "answer is empty".into(),
            });
        }
    }

    if doc.dialect == Dialect::Weighted {
        for section in doc.sections.iter().filter(|s| s.marks.is_none()) {
            warnings.push(ValidationWarning {
                key: Some(section.key.clone()),
                message: "no (N Marks) annotation; the default weight applies".into(),
            });
        }
    }

    warnings
}
