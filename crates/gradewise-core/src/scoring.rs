//! Answer similarity scoring.
//!
//! Both strategies are bag-of-words measures: they ignore word order and
//! grammar and only see which lowercased alphanumeric tokens two answers
//! share. Nothing here attempts semantic matching.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which similarity measure an evaluation run applies to every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// TF-IDF weighted cosine similarity over the two-answer corpus.
    #[default]
    TfidfCosine,
    /// Share of distinct model-answer words that the student also used.
    WordOverlap,
}

impl ScoringStrategy {
    /// Score a student answer against the model answer, in `[0, 1]`.
    pub fn score(&self, student: &str, model: &str) -> f64 {
        match self {
            ScoringStrategy::TfidfCosine => tfidf_cosine(student, model),
            ScoringStrategy::WordOverlap => word_overlap(student, model),
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::TfidfCosine => write!(f, "tfidf_cosine"),
            ScoringStrategy::WordOverlap => write!(f, "word_overlap"),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "tfidf" | "tfidf_cosine" | "cosine" => Ok(ScoringStrategy::TfidfCosine),
            "word_overlap" | "overlap" | "basic" => Ok(ScoringStrategy::WordOverlap),
            other => Err(format!("unknown scoring strategy: {other}")),
        }
    }
}

/// Lowercase `text` and split it on non-alphanumeric characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn term_counts(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the TF-IDF vectors of `a` and `b`.
///
/// The corpus is just the two texts. Term frequency is the raw count and
/// idf is smoothed as `ln((1 + n) / (1 + df)) + 1` with `n = 2`, so a term
/// present in both texts keeps weight 1 and a term unique to one text
/// weighs about 1.405. Returns `0.0` when either text has no tokens or the
/// texts share none.
pub fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let tf_a = term_counts(a);
    let tf_b = term_counts(b);

    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }
    if tf_a == tf_b {
        return 1.0;
    }

    let w_a = tfidf_weights(&tf_a, &tf_b);
    let w_b = tfidf_weights(&tf_b, &tf_a);

    let dot: f64 = w_a
        .iter()
        .filter_map(|(term, wa)| w_b.get(term).map(|wb| wa * wb))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }

    let norm = |w: &HashMap<&str, f64>| w.values().map(|v| v * v).sum::<f64>().sqrt();
    let denominator = norm(&w_a) * norm(&w_b);
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (dot / denominator).clamp(0.0, 1.0)
}

const N_DOCS: f64 = 2.0;

fn smoothed_idf(df: f64) -> f64 {
    ((1.0 + N_DOCS) / (1.0 + df)).ln() + 1.0
}

/// TF-IDF weights of `tf`'s terms, with document frequency counted across
/// `tf` and `other`.
fn tfidf_weights<'a>(
    tf: &'a HashMap<String, f64>,
    other: &HashMap<String, f64>,
) -> HashMap<&'a str, f64> {
    tf.iter()
        .map(|(term, count)| {
            let df = if other.contains_key(term) { 2.0 } else { 1.0 };
            (term.as_str(), count * smoothed_idf(df))
        })
        .collect()
}

/// `|common words| / |model words|` over distinct tokens.
///
/// Not symmetric: extra student words are not penalized.
pub fn word_overlap(student: &str, model: &str) -> f64 {
    let model_words: HashSet<String> = tokenize(model).into_iter().collect();
    if model_words.is_empty() {
        return 0.0;
    }
    let student_words: HashSet<String> = tokenize(student).into_iter().collect();
    let common = model_words.intersection(&student_words).count();

    common as f64 / model_words.len() as f64
}
