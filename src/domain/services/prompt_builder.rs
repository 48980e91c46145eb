use crate::domain::{ChatMessage, CompletionRequest, ConversationTurn};

/// Turns a new question plus prior turns into a chat completion request.
///
/// Output is `[system, (user, assistant) per turn, user]`, so a request built
/// from `n` turns always holds `2n + 2` messages. Turns are replayed in the
/// order given; empty questions or answers are kept as empty messages.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    model: String,
    temperature: f32,
    system_preamble: String,
}

impl PromptBuilder {
    pub fn new(
        model: impl Into<String>,
        temperature: f32,
        system_preamble: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            system_preamble: system_preamble.into(),
        }
    }

    pub fn build(&self, next_question: &str, history: &[ConversationTurn]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(2 * history.len() + 2);
        messages.push(ChatMessage::system(self.system_preamble.as_str()));

        for turn in history {
            messages.push(ChatMessage::user(turn.question()));
            messages.push(ChatMessage::assistant(turn.answer()));
        }

        messages.push(ChatMessage::user(next_question));

        CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages,
        }
    }
}
