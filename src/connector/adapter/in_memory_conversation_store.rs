use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ConversationStore;
use crate::domain::{ConversationTurn, DomainError};

/// Process-local store; turns are returned in insertion order.
pub struct InMemoryConversationStore {
    turns: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with `turns`, kept in the given order.
    pub fn with_turns(turns: impl IntoIterator<Item = ConversationTurn>) -> Self {
        let mut map: HashMap<String, Vec<ConversationTurn>> = HashMap::new();
        for turn in turns {
            map.entry(turn.user_key().to_string()).or_default().push(turn);
        }
        Self {
            turns: Mutex::new(map),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn read(&self, user_key: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        let turns = self.turns.lock().await;
        Ok(turns.get(user_key).cloned().unwrap_or_default())
    }

    async fn append(&self, turn: &ConversationTurn) -> Result<(), DomainError> {
        let mut turns = self.turns.lock().await;
        let entry = turns.entry(turn.user_key().to_string()).or_default();
        if entry.iter().any(|t| t.date_time() == turn.date_time()) {
            return Err(DomainError::persist_failed(format!(
                "turn {} already exists for {}",
                turn.date_time(),
                turn.user_key()
            )));
        }
        entry.push(turn.clone());
        debug!("Appended turn {} for {} to memory", turn.date_time(), turn.user_key());
        Ok(())
    }
}
