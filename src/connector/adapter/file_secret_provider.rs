use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::SecretProvider;
use crate::domain::DomainError;

use super::parse_secret_string;

/// Reads secrets from files under a root directory.
///
/// `prod/api/key/chatgpt` resolves to `<root>/prod/api/key/chatgpt`, whose
/// content is the JSON secret string. Names that would escape the root are
/// refused.
pub struct FileSecretProvider {
    root: PathBuf,
    field: String,
}

impl FileSecretProvider {
    pub fn new(root: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            field: field.into(),
        }
    }

    fn secret_path(&self, secret_name: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(secret_name);
        let confined = !secret_name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !confined {
            return Err(DomainError::secret_unavailable(format!(
                "secret name '{secret_name}' is not a relative path"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn fetch(&self, secret_name: &str) -> Result<String, DomainError> {
        let path = self.secret_path(secret_name)?;
        debug!("Resolving secret '{}' from {}", secret_name, path.display());

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DomainError::secret_unavailable(format!(
                "secret '{secret_name}' not readable at {}: {e}",
                path.display()
            ))
        })?;

        parse_secret_string(secret_name, &raw, &self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_nested_secret_file() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("prod/api/key");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("chatgpt"), r#"{"api-key-chatgpt":"sk-file"}"#).unwrap();

        let provider = FileSecretProvider::new(dir.path(), "api-key-chatgpt");
        assert_eq!(provider.fetch("prod/api/key/chatgpt").await.unwrap(), "sk-file");
    }

    #[tokio::test]
    async fn missing_file_is_secret_unavailable() {
        let dir = tempdir().expect("tempdir");
        let provider = FileSecretProvider::new(dir.path(), "api-key-chatgpt");
        let err = provider.fetch("absent").await.unwrap_err();
        assert!(matches!(err, DomainError::SecretUnavailable(_)));
    }

    #[tokio::test]
    async fn refuses_names_escaping_the_root() {
        let dir = tempdir().expect("tempdir");
        let provider = FileSecretProvider::new(dir.path(), "k");
        for name in ["../etc/passwd", "/etc/passwd", "a/../../b", ""] {
            let err = provider.fetch(name).await.unwrap_err();
            assert!(matches!(err, DomainError::SecretUnavailable(_)), "{name}");
        }
    }
}
