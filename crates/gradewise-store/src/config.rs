//! gradewise configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradewise_core::engine::EvaluationConfig;
use gradewise_core::error::GradingError;
use gradewise_core::scoring::ScoringStrategy;

/// Top-level gradewise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// Weight of questions without a `(N Marks)` annotation.
    #[serde(default = "default_marks")]
    pub default_marks_per_question: f64,
    /// Similarity measure used for every question of a run.
    #[serde(default)]
    pub scoring_strategy: ScoringStrategy,
    /// Directory holding the current model answers.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Max student sheets graded concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_marks() -> f64 {
    10.0
}
fn default_store_dir() -> PathBuf {
    PathBuf::from("./gradewise-store")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./gradewise-results")
}
fn default_parallelism() -> usize {
    4
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            default_marks_per_question: default_marks(),
            scoring_strategy: ScoringStrategy::default(),
            store_dir: default_store_dir(),
            output_dir: default_output_dir(),
            parallelism: default_parallelism(),
        }
    }
}

impl GradewiseConfig {
    /// The validated engine configuration.
    pub fn evaluation_config(&self) -> Result<EvaluationConfig, GradingError> {
        let config =
            EvaluationConfig::new(self.default_marks_per_question, self.scoring_strategy);
        config.validate()?;
        Ok(config)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Single pass: substituted values are never rescanned, and an unterminated
/// `${` is kept literally.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_STORE_DIR`, `GRADEWISE_STRATEGY`.
pub fn load_config() -> Result<GradewiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradewise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<GradewiseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradewiseConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("GRADEWISE_STORE_DIR") {
        config.store_dir = PathBuf::from(dir);
    }
    if let Ok(strategy) = std::env::var("GRADEWISE_STRATEGY") {
        config.scoring_strategy = strategy
            .parse()
            .map_err(|e: String| anyhow::anyhow!("GRADEWISE_STRATEGY: {e}"))?;
    }

    config.store_dir = resolve_path(&config.store_dir);
    config.output_dir = resolve_path(&config.output_dir);

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradewise"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GRADEWISE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_GRADEWISE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_GRADEWISE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_vars_here"), "no_vars_here");
        std::env::remove_var("_GRADEWISE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_GRADEWISE_SELF_REF", "a${_GRADEWISE_SELF_REF}b");
        assert_eq!(
            resolve_env_vars("/data/${_GRADEWISE_SELF_REF}/x"),
            "/data/a${_GRADEWISE_SELF_REF}b/x"
        );
        std::env::remove_var("_GRADEWISE_SELF_REF");

        assert_eq!(resolve_env_vars("${_GRADEWISE_UNSET_VAR}/x"), "/x");
        assert_eq!(resolve_env_vars("dir/${unterminated"), "dir/${unterminated");
    }

    #[test]
    fn default_config() {
        let config = GradewiseConfig::default();
        assert_eq!(config.default_marks_per_question, 10.0);
        assert_eq!(config.scoring_strategy, ScoringStrategy::TfidfCosine);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn parse_config() {
        let toml_str = r#"
default_marks_per_question = 5.0
scoring_strategy = "word_overlap"
store_dir = "/var/lib/gradewise"
parallelism = 2
"#;
        let config: GradewiseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring_strategy, ScoringStrategy::WordOverlap);
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/gradewise"));
        assert_eq!(config.output_dir, PathBuf::from("./gradewise-results"));
        assert_eq!(config.evaluation_config().unwrap().default_marks_per_question, 5.0);
    }

    #[test]
    fn negative_marks_fail_validation() {
        let config: GradewiseConfig = toml::from_str("default_marks_per_question = -2.0").unwrap();
        assert!(matches!(
            config.evaluation_config(),
            Err(GradingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/gradewise.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "default_marks_per_question = 4.0\nparallelism = 1\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_marks_per_question, 4.0);
        assert_eq!(config.parallelism, 1);
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "parallelism = 0\n").unwrap();

        assert!(load_config_from(Some(&path)).is_err());
    }
}
