//! End-to-end tests over real sockets: a local axum server stands in for the
//! completion endpoint, and the HTTP trigger is exercised with reqwest.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{json, Value};

use chatrelay::connector::api::http_server;
use chatrelay::{
    CompletionClient, Container, ConversationStore, DomainError, InMemoryConversationStore,
    RelayConfig, ReqwestCompletionClient, StaticSecretProvider,
};

#[derive(Default)]
struct Captured {
    authorization: Option<String>,
    body: Option<Value>,
}

/// Start a fake completion endpoint answering every request with `status` and `body`.
async fn spawn_completion_endpoint(
    status: StatusCode,
    body: Value,
    delay: Duration,
) -> (String, Arc<Mutex<Captured>>) {
    let captured = Arc::new(Mutex::new(Captured::default()));

    let app = axum::Router::new()
        .route(
            "/v1/chat/completions",
            post(
                move |State(captured): State<Arc<Mutex<Captured>>>,
                      headers: HeaderMap,
                      request: Bytes| {
                    let body = body.clone();
                    async move {
                        {
                            let mut c = captured.lock().unwrap();
                            c.authorization = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            c.body = serde_json::from_slice(&request).ok();
                        }
                        tokio::time::sleep(delay).await;
                        (status, axum::Json(body))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1/chat/completions"), captured)
}

fn answer_body(content: &str) -> Value {
    json!({ "id": "chatcmpl-1", "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }] })
}

#[tokio::test]
async fn reqwest_client_returns_status_and_body() {
    let (url, captured) =
        spawn_completion_endpoint(StatusCode::OK, answer_body("Padre Island"), Duration::ZERO).await;
    let client = ReqwestCompletionClient::new(Duration::from_secs(5)).unwrap();

    let headers: BTreeMap<String, String> = [
        ("Authorization".to_string(), "Bearer sk-http".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ]
    .into_iter()
    .collect();
    let response = client
        .send(&url, &headers, br#"{"model":"m","messages":[]}"#.to_vec())
        .await
        .expect("send");

    assert_eq!(response.status, 200);
    assert_eq!(chatrelay::extract_answer(&response.body).unwrap(), "Padre Island");
    assert_eq!(
        captured.lock().unwrap().authorization.as_deref(),
        Some("Bearer sk-http")
    );
}

#[tokio::test]
async fn reqwest_client_passes_error_statuses_through() {
    let (url, _) = spawn_completion_endpoint(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "bad key" } }),
        Duration::ZERO,
    )
    .await;
    let client = ReqwestCompletionClient::new(Duration::from_secs(5)).unwrap();

    let response = client
        .send(&url, &Default::default(), b"{}".to_vec())
        .await
        .expect("an HTTP error status is still a response");
    assert_eq!(response.status, 401);
    assert!(!response.is_success());
}

#[tokio::test]
async fn reqwest_client_times_out_as_transport_error() {
    let (url, _) = spawn_completion_endpoint(
        StatusCode::OK,
        answer_body("late"),
        Duration::from_secs(5),
    )
    .await;
    let client = ReqwestCompletionClient::new(Duration::from_millis(200)).unwrap();

    let err = client
        .send(&url, &Default::default(), b"{}".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TransportError(_)), "got {err:?}");
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn reqwest_client_reports_refused_connection() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ReqwestCompletionClient::new(Duration::from_secs(2)).unwrap();
    let err = client
        .send(&format!("http://{addr}/v1/chat/completions"), &Default::default(), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TransportError(_)));
}

async fn spawn_trigger(container: Container) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = http_server::router(Arc::new(container));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn http_trigger_runs_pipeline_and_records_turn() {
    let (url, captured) =
        spawn_completion_endpoint(StatusCode::OK, answer_body("Padre Island"), Duration::ZERO).await;
    let store = Arc::new(InMemoryConversationStore::new());
    let config = RelayConfig {
        completion_url: url,
        ..RelayConfig::default()
    };
    let container = Container::with_components(
        config,
        Arc::new(StaticSecretProvider::new("sk-trigger")),
        store.clone() as Arc<dyn ConversationStore>,
        Arc::new(ReqwestCompletionClient::new(Duration::from_secs(5)).unwrap())
            as Arc<dyn CompletionClient>,
    );
    let addr = spawn_trigger(container).await;
    let http = reqwest::Client::new();

    let health = http.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let response = http
        .post(format!("http://{addr}/invoke"))
        .json(&json!({ "userKey": "surfer", "question": "Best break near Corpus Christi?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["answer"], "Padre Island");

    {
        let c = captured.lock().unwrap();
        assert_eq!(c.authorization.as_deref(), Some("Bearer sk-trigger"));
        let sent = c.body.as_ref().unwrap();
        assert_eq!(sent["messages"].as_array().unwrap().len(), 2);
    }

    let turns = store.read("surfer").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].answer(), "Padre Island");
}

#[tokio::test]
async fn http_trigger_maps_failures_to_status_codes() {
    let (url, _) = spawn_completion_endpoint(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": "overloaded" }),
        Duration::ZERO,
    )
    .await;
    let config = RelayConfig {
        completion_url: url,
        ..RelayConfig::default()
    };
    let container = Container::with_components(
        config,
        Arc::new(StaticSecretProvider::new("sk-trigger")),
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(ReqwestCompletionClient::new(Duration::from_secs(5)).unwrap()),
    );
    let addr = spawn_trigger(container).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("http://{addr}/invoke"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "completion_request_failed");
    assert_eq!(body["stage"], "sending_request");

    let response = http
        .post(format!("http://{addr}/invoke"))
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_input");
    assert!(body.get("stage").is_none());
}
