use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::{CompletionClient, CompletionHttpResponse};
use crate::domain::DomainError;

/// [`CompletionClient`] over `reqwest` with a hard per-request timeout.
///
/// The timeout covers connect, send and reading the body. Requests are never
/// retried.
pub struct ReqwestCompletionClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestCompletionClient {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::transport(format!(
                "request to {url} timed out after {}s",
                self.timeout.as_secs_f32()
            ))
        } else {
            DomainError::transport(format!("request to {url} failed: {e}"))
        }
    }
}

#[async_trait]
impl CompletionClient for ReqwestCompletionClient {
    async fn send(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Vec<u8>,
    ) -> Result<CompletionHttpResponse, DomainError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!("POST {} ({} bytes)", url, body.len());
        let response = request.body(body).send().await.map_err(|e| {
            warn!("Completion request to {} failed: {}", url, e);
            self.transport_error(url, e)
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        debug!("Completion endpoint answered {} ({} bytes)", status, bytes.len());
        Ok(CompletionHttpResponse::new(status, bytes.to_vec()))
    }
}
