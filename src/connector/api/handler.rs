use tracing::{error, info};

use crate::domain::{InvocationEvent, InvocationOutcome};

use super::Container;

/// Run one invocation end to end and classify the result.
///
/// Event fields that are absent fall back to the configured defaults; fields
/// that are present are used as given, so an empty question is rejected
/// rather than silently replaced.
pub async fn handle_event(container: &Container, event: InvocationEvent) -> InvocationOutcome {
    let config = container.config();
    let user_key = event
        .user_key
        .unwrap_or_else(|| config.default_user_key.clone());
    let question = event
        .question
        .unwrap_or_else(|| config.default_question.clone());

    let use_case = container.ask_question_use_case();
    match use_case.execute(&user_key, &question).await {
        Ok(turn) => {
            info!("Invocation for {} succeeded", user_key);
            InvocationOutcome::Success {
                message: config.success_message.clone(),
                answer: turn.answer().to_string(),
            }
        }
        Err(failure) => {
            error!("Invocation for {} failed: {}", user_key, failure);
            InvocationOutcome::Failure {
                kind: failure.kind(),
                message: failure.error.to_string(),
                stage: Some(failure.stage),
                answer: failure.answer,
            }
        }
    }
}
