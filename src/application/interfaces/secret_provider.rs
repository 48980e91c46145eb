use async_trait::async_trait;

use crate::domain::DomainError;

/// Resolves credentials at invocation time instead of embedding them in code.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Return the credential stored under `secret_name`.
    ///
    /// Fails with [`DomainError::SecretUnavailable`] when the secret is absent,
    /// unreadable, or lacks the expected field.
    async fn fetch(&self, secret_name: &str) -> Result<String, DomainError>;
}
