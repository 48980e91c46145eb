use async_trait::async_trait;
use tracing::debug;

use crate::application::SecretProvider;
use crate::domain::DomainError;

use super::parse_secret_string;

/// Reads secrets from environment variables.
///
/// The variable name is derived from the secret name by upper-casing it and
/// replacing every non-alphanumeric character with `_`, so
/// `prod/api/key/chatgpt` is read from `PROD_API_KEY_CHATGPT`. The variable
/// holds the JSON secret string.
pub struct EnvSecretProvider {
    field: String,
}

impl EnvSecretProvider {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn variable_name(secret_name: &str) -> String {
        secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn fetch(&self, secret_name: &str) -> Result<String, DomainError> {
        let variable = Self::variable_name(secret_name);
        debug!("Resolving secret '{}' from ${}", secret_name, variable);

        let raw = std::env::var(&variable).map_err(|e| {
            DomainError::secret_unavailable(format!(
                "secret '{secret_name}' not available in ${variable}: {e}"
            ))
        })?;

        parse_secret_string(secret_name, &raw, &self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_name_is_shell_safe() {
        assert_eq!(
            EnvSecretProvider::variable_name("prod/api/key/chatgpt"),
            "PROD_API_KEY_CHATGPT"
        );
        assert_eq!(EnvSecretProvider::variable_name("a-b.c"), "A_B_C");
    }

    #[tokio::test]
    async fn fetches_field_from_environment() {
        std::env::set_var(
            "CHATRELAY_TEST_ENV_SECRET_OK",
            r#"{"api-key-chatgpt":"sk-env"}"#,
        );
        let provider = EnvSecretProvider::new("api-key-chatgpt");
        let key = provider
            .fetch("chatrelay/test/env/secret/ok")
            .await
            .expect("secret");
        assert_eq!(key, "sk-env");
    }

    #[tokio::test]
    async fn unset_variable_is_secret_unavailable() {
        let provider = EnvSecretProvider::new("api-key-chatgpt");
        let err = provider
            .fetch("chatrelay/test/env/secret/never/set")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SecretUnavailable(_)));
    }
}
