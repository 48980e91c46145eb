use async_trait::async_trait;

use crate::domain::{ConversationTurn, DomainError};

/// Append-only persistence of conversation turns, keyed by user identity.
///
/// Implementations used with concurrent invocations for the same user must
/// make each `append` atomic; nothing above this trait coordinates writers.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All turns stored for `user_key`, in store-defined order. An unknown
    /// user yields an empty vector.
    async fn read(&self, user_key: &str) -> Result<Vec<ConversationTurn>, DomainError>;

    async fn append(&self, turn: &ConversationTurn) -> Result<(), DomainError>;
}
