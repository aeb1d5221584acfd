//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the model-answer stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The assessment name cannot be used as a storage key.
    #[error("invalid assessment name '{0}': use 1-128 letters, digits, '-' or '_'")]
    InvalidName(String),

    /// Error reading or writing the store.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record could not be decoded.
    #[error("corrupt model answer record '{path}': {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding the in-memory store was poisoned.
    #[error("model store lock poisoned")]
    Poisoned,
}
