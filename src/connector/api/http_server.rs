use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tracing::{info, warn};

use crate::domain::{DomainError, InvocationEvent, InvocationOutcome, InvocationResponse};

use super::{handle_event, Container};

/// HTTP trigger: `POST /invoke` runs one invocation, `GET /health` reports liveness.
pub fn router(container: Arc<Container>) -> axum::Router {
    axum::Router::new()
        .route("/invoke", post(invoke))
        .route("/health", get(health))
        .with_state(container)
}

pub async fn serve(container: Arc<Container>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(container))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn invoke(State(container): State<Arc<Container>>, body: Bytes) -> Response {
    let response = match parse_event(&body) {
        Ok(event) => handle_event(&container, event).await.into_response(),
        Err(e) => InvocationOutcome::Failure {
            kind: e.kind(),
            message: e.to_string(),
            stage: None,
            answer: None,
        }
        .into_response(),
    };
    to_http(response)
}

/// An empty body is an event with every field defaulted.
fn parse_event(body: &[u8]) -> Result<InvocationEvent, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InvocationEvent::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| DomainError::invalid_input(format!("event is not valid JSON: {e}")))
}

fn to_http(response: InvocationResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}
