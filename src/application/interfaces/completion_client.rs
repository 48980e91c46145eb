use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Raw HTTP result from the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl CompletionHttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request body to a chat completion endpoint.
///
/// Implementors own transport details (connection pooling, TLS, timeouts).
/// Any HTTP status is returned as a response; only failures to get a response
/// at all are errors.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn send(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Vec<u8>,
    ) -> Result<CompletionHttpResponse, DomainError>;
}
