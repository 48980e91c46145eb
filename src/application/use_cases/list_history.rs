use std::sync::Arc;

use crate::application::ConversationStore;
use crate::domain::{sort_chronologically, ConversationTurn, DomainError};

pub struct ListHistoryUseCase {
    conversation_store: Arc<dyn ConversationStore>,
}

impl ListHistoryUseCase {
    pub fn new(conversation_store: Arc<dyn ConversationStore>) -> Self {
        Self { conversation_store }
    }

    /// Stored turns for `user_key`, oldest first.
    pub async fn execute(&self, user_key: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        let mut turns = self.conversation_store.read(user_key).await?;
        sort_chronologically(&mut turns);
        Ok(turns)
    }
}
