//! Implements TokenStore using a flat key=value .env file.
//!
//! The same file dotenv reads at startup: ZOOM_ACCESS_TOKEN plus an optional
//! ZOOM_REFRESH_TOKEN.

use crate::domain::{DomainError, TokenSet};
use crate::ports::TokenStore;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// .env-file token storage.
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn render(tokens: &TokenSet) -> String {
        let mut out = String::new();
        out.push_str("# Zoom OAuth access token\n");
        out.push_str("# Obtained via zoom-react-auth; expires after about an hour\n");
        out.push_str(&format!("ZOOM_ACCESS_TOKEN={}\n", tokens.access_token));
        if let Some(refresh) = &tokens.refresh_token {
            out.push_str("\n# Refresh token for obtaining new access tokens\n");
            out.push_str(&format!("ZOOM_REFRESH_TOKEN={refresh}\n"));
        }
        out
    }

    /// Atomic save using write-replace:
    /// 1. Write to temp file
    /// 2. sync_all() to ensure flush to disk
    /// 3. Atomic rename to target path
    async fn write_replace(&self, content: &str) -> Result<(), DomainError> {
        let temp_path = self.path.with_extension("tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::TokenStore(format!("create temp file: {e}")))?;
        f.write_all(content.as_bytes())
            .await
            .map_err(|e| DomainError::TokenStore(format!("write temp file: {e}")))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::TokenStore(format!("sync temp file: {e}")))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::TokenStore(format!("atomic rename failed: {e}")))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenStore for EnvFileStore {
    async fn save(&self, tokens: &TokenSet) -> Result<(), DomainError> {
        self.write_replace(&Self::render(tokens)).await?;
        info!(path = %self.path.display(), "tokens written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_env_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("zoom-react-test-{}-{tag}.env", std::process::id()))
    }

    #[tokio::test]
    async fn test_save_writes_both_tokens() {
        let path = temp_env_path("both");
        let store = EnvFileStore::new(&path);
        store
            .save(&TokenSet {
                access_token: "acc-123".into(),
                refresh_token: Some("ref-456".into()),
                expires_in: Some(3600),
            })
            .await
            .unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        fs::remove_file(&path).await.unwrap();

        assert!(content.contains("ZOOM_ACCESS_TOKEN=acc-123\n"));
        assert!(content.contains("ZOOM_REFRESH_TOKEN=ref-456\n"));
    }

    #[tokio::test]
    async fn test_save_omits_missing_refresh_token() {
        let path = temp_env_path("access-only");
        let store = EnvFileStore::new(&path);
        store
            .save(&TokenSet {
                access_token: "acc-only".into(),
                refresh_token: None,
                expires_in: None,
            })
            .await
            .unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        fs::remove_file(&path).await.unwrap();

        assert!(content.contains("ZOOM_ACCESS_TOKEN=acc-only\n"));
        assert!(!content.contains("ZOOM_REFRESH_TOKEN"));
    }

    #[tokio::test]
    async fn test_save_replaces_previous_content() {
        let path = temp_env_path("replace");
        let store = EnvFileStore::new(&path);
        for token in ["first", "second"] {
            store
                .save(&TokenSet {
                    access_token: token.into(),
                    refresh_token: None,
                    expires_in: None,
                })
                .await
                .unwrap();
        }

        let content = fs::read_to_string(&path).await.unwrap();
        fs::remove_file(&path).await.unwrap();

        assert!(content.contains("ZOOM_ACCESS_TOKEN=second\n"));
        assert!(!content.contains("first"));
    }
}
