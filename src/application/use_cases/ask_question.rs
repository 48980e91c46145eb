use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::{CompletionClient, ConversationStore, SecretProvider};
use crate::config::RelayConfig;
use crate::domain::{
    extract_answer, sort_chronologically, ConversationTurn, DomainError, ErrorKind, PromptBuilder,
    Stage,
};

/// The stage a pipeline run stopped at, with the error that stopped it.
///
/// `answer` is set when the completion succeeded but the turn could not be
/// recorded, so callers can still report what the model said.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: DomainError,
    pub answer: Option<String>,
}

impl PipelineFailure {
    fn at(stage: Stage, error: DomainError) -> Self {
        Self {
            stage,
            error,
            answer: None,
        }
    }

    /// Failure of a collaborator call at `stage`.
    ///
    /// Each collaborator stage has one failure kind; an adapter error of any
    /// other kind is rewrapped into it, keeping the original message.
    fn from_collaborator(stage: Stage, error: DomainError) -> Self {
        let expected = match stage {
            Stage::FetchingSecret => ErrorKind::SecretUnavailable,
            Stage::ReadingHistory => ErrorKind::HistoryUnavailable,
            Stage::SendingRequest => ErrorKind::TransportError,
            Stage::PersistingTurn => ErrorKind::PersistFailed,
            _ => return Self::at(stage, error),
        };
        if error.kind() == expected {
            return Self::at(stage, error);
        }

        let message = error.to_string();
        let error = match expected {
            ErrorKind::SecretUnavailable => DomainError::secret_unavailable(message),
            ErrorKind::HistoryUnavailable => DomainError::history_unavailable(message),
            ErrorKind::TransportError => DomainError::transport(message),
            _ => DomainError::persist_failed(message),
        };
        Self::at(stage, error)
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Answers one question in the context of a user's prior turns.
///
/// Runs secret lookup, history read, prompt assembly, the completion call,
/// answer extraction and the history write, in that order. The first failure
/// aborts the run; nothing is retried.
pub struct AskQuestionUseCase {
    secret_provider: Arc<dyn SecretProvider>,
    conversation_store: Arc<dyn ConversationStore>,
    completion_client: Arc<dyn CompletionClient>,
    prompt_builder: PromptBuilder,
    secret_name: String,
    completion_url: String,
}

impl AskQuestionUseCase {
    pub fn new(
        secret_provider: Arc<dyn SecretProvider>,
        conversation_store: Arc<dyn ConversationStore>,
        completion_client: Arc<dyn CompletionClient>,
        config: &RelayConfig,
    ) -> Self {
        Self {
            secret_provider,
            conversation_store,
            completion_client,
            prompt_builder: PromptBuilder::new(
                config.model.clone(),
                config.temperature,
                config.system_preamble.clone(),
            ),
            secret_name: config.secret_name.clone(),
            completion_url: config.completion_url.clone(),
        }
    }

    /// Ask `question` on behalf of `user_key` and return the recorded turn.
    pub async fn execute(
        &self,
        user_key: &str,
        question: &str,
    ) -> Result<ConversationTurn, PipelineFailure> {
        if user_key.trim().is_empty() {
            return Err(PipelineFailure::at(
                Stage::BuildingPayload,
                DomainError::invalid_input("user key must not be empty"),
            ));
        }
        if question.trim().is_empty() {
            return Err(PipelineFailure::at(
                Stage::BuildingPayload,
                DomainError::invalid_input("question must not be empty"),
            ));
        }

        debug!(stage = %Stage::FetchingSecret, "Fetching API credential");
        let api_key = self
            .secret_provider
            .fetch(&self.secret_name)
            .await
            .map_err(|e| PipelineFailure::from_collaborator(Stage::FetchingSecret, e))?;

        debug!(stage = %Stage::ReadingHistory, user_key, "Reading conversation history");
        let mut history = self
            .conversation_store
            .read(user_key)
            .await
            .map_err(|e| PipelineFailure::from_collaborator(Stage::ReadingHistory, e))?;
        sort_chronologically(&mut history);
        debug!("Loaded {} prior turns for {}", history.len(), user_key);

        debug!(stage = %Stage::BuildingPayload, "Building completion request");
        info!("Question: {}", question);
        let request = self.prompt_builder.build(question, &history);
        let body = request.to_json_bytes().map_err(|e| {
            PipelineFailure::at(
                Stage::BuildingPayload,
                DomainError::internal(format!("Failed to serialize request: {e}")),
            )
        })?;

        debug!(
            stage = %Stage::SendingRequest,
            messages = request.messages.len(),
            "Calling completion endpoint"
        );
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {api_key}")),
        ]);
        let response = self
            .completion_client
            .send(&self.completion_url, &headers, body)
            .await
            .map_err(|e| PipelineFailure::from_collaborator(Stage::SendingRequest, e))?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!("Completion endpoint returned {}: {}", response.status, body);
            return Err(PipelineFailure::at(
                Stage::SendingRequest,
                DomainError::completion_failed(response.status, body),
            ));
        }

        debug!(stage = %Stage::ExtractingAnswer, "Extracting answer");
        let answer = extract_answer(&response.body)
            .map_err(|e| PipelineFailure::at(Stage::ExtractingAnswer, e))?;
        info!("Answer: {}", answer);

        debug!(stage = %Stage::PersistingTurn, "Recording turn");
        let turn = ConversationTurn::now(user_key.to_string(), question.to_string(), answer);
        if let Err(error) = self.conversation_store.append(&turn).await {
            warn!("Answer produced but turn not recorded: {}", error);
            return Err(PipelineFailure {
                answer: Some(turn.answer().to_string()),
                ..PipelineFailure::from_collaborator(Stage::PersistingTurn, error)
            });
        }

        debug!(stage = %Stage::Done, "Turn recorded at {}", turn.date_time());
        Ok(turn)
    }
}
