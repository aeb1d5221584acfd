//! Model-answer repositories.
//!
//! Each assessment name maps to exactly one current model answer; storing a
//! new one replaces the old.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use gradewise_core::model::ModelAnswer;
use gradewise_core::traits::ModelAnswerRepository;

use crate::error::StoreError;

const MAX_NAME_LEN: usize = 128;

/// Check that `name` is usable as a storage key.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Stores each model answer as `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    root: PathBuf,
}

impl FileModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.json")))
    }

    fn read_record(path: &Path) -> Result<ModelAnswer, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ModelAnswerRepository for FileModelStore {
    fn get_current_model(&self, name: &str) -> anyhow::Result<Option<ModelAnswer>> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_record(&path)?))
    }

    fn set_current_model(&self, answer: ModelAnswer) -> anyhow::Result<()> {
        let path = self.path_for(&answer.name)?;
        std::fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(&answer)?;
        // Write then rename so readers never see a half-written record.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            name = %answer.name,
            id = %answer.id,
            questions = answer.answers.len(),
            "stored model answer"
        );
        Ok(())
    }

    fn list_models(&self) -> anyhow::Result<Vec<ModelAnswer>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut models = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match Self::read_record(&path) {
                    Ok(model) => models.push(model),
                    Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
                }
            }
        }

        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps model answers in memory; shared read access, exclusive writes.
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    models: RwLock<HashMap<String, ModelAnswer>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelAnswerRepository for InMemoryModelStore {
    fn get_current_model(&self, name: &str) -> anyhow::Result<Option<ModelAnswer>> {
        let models = self.models.read().map_err(|_| StoreError::Poisoned)?;
        Ok(models.get(name).cloned())
    }

    fn set_current_model(&self, answer: ModelAnswer) -> anyhow::Result<()> {
        validate_name(&answer.name)?;
        let mut models = self.models.write().map_err(|_| StoreError::Poisoned)?;
        models.insert(answer.name.clone(), answer);
        Ok(())
    }

    fn list_models(&self) -> anyhow::Result<Vec<ModelAnswer>> {
        let models = self.models.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<ModelAnswer> = models.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}
