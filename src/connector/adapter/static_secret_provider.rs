use async_trait::async_trait;

use crate::application::SecretProvider;
use crate::domain::DomainError;

/// Returns one fixed credential for every secret name.
pub struct StaticSecretProvider {
    value: String,
}

impl StaticSecretProvider {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn fetch(&self, _secret_name: &str) -> Result<String, DomainError> {
        Ok(self.value.clone())
    }
}
