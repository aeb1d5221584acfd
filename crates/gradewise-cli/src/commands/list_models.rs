//! The `gradewise list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::traits::ModelAnswerRepository;
use gradewise_store::config::load_config_from;
use gradewise_store::FileModelStore;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = FileModelStore::new(&config.store_dir);
    let models = store.list_models()?;

    if models.is_empty() {
        println!("No model answers stored. Run `gradewise upload-model` to add one.");
        return Ok(());
    }

    for model in &models {
        println!(
            "{}: {} questions, {:.2} marks ({}), uploaded {}",
            model.name,
            model.answers.len(),
            model.answers.total_marks(config.default_marks_per_question),
            model.source,
            model.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }

    Ok(())
}
