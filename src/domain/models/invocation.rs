use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ErrorKind;

/// Stages of a single ask-question invocation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FetchingSecret,
    ReadingHistory,
    BuildingPayload,
    SendingRequest,
    ExtractingAnswer,
    PersistingTurn,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchingSecret => "fetching_secret",
            Stage::ReadingHistory => "reading_history",
            Stage::BuildingPayload => "building_payload",
            Stage::SendingRequest => "sending_request",
            Stage::ExtractingAnswer => "extracting_answer",
            Stage::PersistingTurn => "persisting_turn",
            Stage::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered by the invocation trigger.
///
/// Both fields are optional; missing values fall back to the configured
/// defaults. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub user_key: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

impl InvocationEvent {
    pub fn new(user_key: Option<String>, question: Option<String>) -> Self {
        Self { user_key, question }
    }
}

/// Tagged result of one invocation, before it is mapped to a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success {
        message: String,
        answer: String,
    },
    Failure {
        kind: ErrorKind,
        message: String,
        /// `None` when the event was rejected before any stage ran.
        stage: Option<Stage>,
        /// Present when the answer was produced but a later stage failed.
        answer: Option<String>,
    },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            InvocationOutcome::Success { .. } => 200,
            InvocationOutcome::Failure { kind, .. } => kind.status_code(),
        }
    }

    pub fn into_response(self) -> InvocationResponse {
        let status_code = self.status_code();
        let body = match self {
            InvocationOutcome::Success { message, answer } => {
                json!({ "message": message, "answer": answer })
            }
            InvocationOutcome::Failure {
                kind,
                message,
                stage,
                answer,
            } => {
                let mut body = json!({
                    "error": kind,
                    "message": message,
                });
                if let Some(stage) = stage {
                    body["stage"] = json!(stage);
                }
                if let Some(answer) = answer {
                    body["answer"] = json!(answer);
                }
                body
            }
        };

        InvocationResponse {
            status_code,
            body: body.to_string(),
        }
    }
}

/// Transport-neutral `{statusCode, body}` returned to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}
