//! gradewise-store — Configuration and model-answer storage.
//!
//! Loads `gradewise.toml` and implements the `ModelAnswerRepository` trait
//! with a JSON file store and an in-memory store.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{load_config, load_config_from, GradewiseConfig};
pub use error::StoreError;
pub use repository::{FileModelStore, InMemoryModelStore};
