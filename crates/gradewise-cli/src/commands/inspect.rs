//! The `gradewise inspect` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::parser;
use gradewise_extract::load_answer_document;

const PREVIEW_CHARS: usize = 60;

pub async fn execute(file: PathBuf) -> Result<()> {
    let document = load_answer_document(&file).await?;
    let segmented = parser::scan(&document.text);

    println!(
        "{}: {} question(s), {} labels",
        document.source,
        segmented.sections.len(),
        segmented.dialect
    );

    for section in &segmented.sections {
        let marks = section
            .marks
            .map(|m| format!("{m} marks"))
            .unwrap_or_else(|| "default".to_string());
        println!("  {:<6} [{marks}] {}", section.key, preview(&section.text));
    }

    let warnings = parser::validate_segments(&segmented);
    for w in &warnings {
        let prefix = w
            .key
            .as_ref()
            .map(|key| format!("  [{key}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("No issues found.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

/// First line of `text`, cut to a fixed number of characters.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else if line.is_empty() {
        "(empty)".to_string()
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_and_marks_empty() {
        assert_eq!(preview(""), "(empty)");
        assert_eq!(preview("short\nsecond line"), "short");
        let long = "é".repeat(PREVIEW_CHARS + 5);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
    }
}
