//! Plain-text answer sheets.

use std::path::Path;

use async_trait::async_trait;

use gradewise_core::traits::TextExtractor;

/// Reads a text file as-is. Invalid UTF-8 sequences are replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    async fn extract(&self, path: &Path) -> String {
        match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_empty_text() {
        assert_eq!(
            PlainTextExtractor
                .extract(Path::new("/definitely/not/here.txt"))
                .await,
            ""
        );
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"Q1 caf\xe9").unwrap();

        let text = PlainTextExtractor.extract(&path).await;
        assert!(text.starts_with("Q1 caf"));
        assert!(text.contains('\u{FFFD}'));
    }
}
