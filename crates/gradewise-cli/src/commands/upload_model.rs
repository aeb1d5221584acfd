//! The `gradewise upload-model` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::error::GradingError;
use gradewise_core::model::ModelAnswer;
use gradewise_core::parser;
use gradewise_core::traits::ModelAnswerRepository;
use gradewise_extract::load_answer_document;
use gradewise_store::config::load_config_from;
use gradewise_store::repository::validate_name;
use gradewise_store::FileModelStore;

pub async fn execute(name: String, file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    validate_name(&name)?;
    let config = load_config_from(config_path.as_deref())?;

    let document = load_answer_document(&file).await?;
    let segmented = parser::scan(&document.text);

    for w in parser::validate_segments(&segmented) {
        let prefix = w
            .key
            .as_ref()
            .map(|key| format!("  [{key}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if segmented.sections.is_empty() {
        return Err(GradingError::NoModelQuestionsFound.into());
    }

    let dialect = segmented.dialect;
    let answers = segmented.into_answer_set();
    let total = answers.total_marks(config.default_marks_per_question);
    let count = answers.len();

    let store = FileModelStore::new(&config.store_dir);
    store.set_current_model(ModelAnswer::new(&name, document, answers))?;

    println!(
        "Stored model answer '{name}' ({count} questions, {total:.2} marks, {dialect} labels)"
    );

    Ok(())
}
