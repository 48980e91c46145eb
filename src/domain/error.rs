use serde::Serialize;
use thiserror::Error;

/// Stable classification of a [`DomainError`], reported in failure bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SecretUnavailable,
    HistoryUnavailable,
    TransportError,
    CompletionRequestFailed,
    MalformedResponse,
    MissingField,
    PersistFailed,
    InvalidInput,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SecretUnavailable => "secret_unavailable",
            ErrorKind::HistoryUnavailable => "history_unavailable",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::CompletionRequestFailed => "completion_request_failed",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::PersistFailed => "persist_failed",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }

    /// Status code reported to the invocation trigger for this kind of failure.
    ///
    /// Upstream problems with the completion endpoint are gateway errors; our
    /// own collaborators failing is a server error.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::TransportError
            | ErrorKind::CompletionRequestFailed
            | ErrorKind::MalformedResponse
            | ErrorKind::MissingField => 502,
            ErrorKind::SecretUnavailable
            | ErrorKind::HistoryUnavailable
            | ErrorKind::PersistFailed
            | ErrorKind::Config
            | ErrorKind::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("History unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Completion request failed with status {status}: {body}")]
    CompletionRequestFailed { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Persist failed: {0}")]
    PersistFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn secret_unavailable(msg: impl Into<String>) -> Self {
        Self::SecretUnavailable(msg.into())
    }

    pub fn history_unavailable(msg: impl Into<String>) -> Self {
        Self::HistoryUnavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn completion_failed(status: u16, body: impl Into<String>) -> Self {
        Self::CompletionRequestFailed {
            status,
            body: body.into(),
        }
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField(path.into())
    }

    pub fn persist_failed(msg: impl Into<String>) -> Self {
        Self::PersistFailed(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SecretUnavailable(_) => ErrorKind::SecretUnavailable,
            Self::HistoryUnavailable(_) => ErrorKind::HistoryUnavailable,
            Self::TransportError(_) => ErrorKind::TransportError,
            Self::CompletionRequestFailed { .. } => ErrorKind::CompletionRequestFailed,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::PersistFailed(_) => ErrorKind::PersistFailed,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}
