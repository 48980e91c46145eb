use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{
    AskQuestionUseCase, CompletionClient, ConversationStore, ListHistoryUseCase, SecretProvider,
};
use crate::config::RelayConfig;
use crate::connector::adapter::{
    DuckdbConversationStore, EnvSecretProvider, FileSecretProvider, InMemoryConversationStore,
    ReqwestCompletionClient,
};

/// Wires adapters to use cases according to a [`RelayConfig`].
pub struct Container {
    secret_provider: Arc<dyn SecretProvider>,
    conversation_store: Arc<dyn ConversationStore>,
    completion_client: Arc<dyn CompletionClient>,
    config: RelayConfig,
}

impl Container {
    pub fn new(config: RelayConfig) -> Result<Self> {
        config.validate()?;

        let secret_provider: Arc<dyn SecretProvider> = match config.secrets_dir.as_deref() {
            Some(dir) => {
                debug!("Reading secrets from {}", dir.display());
                Arc::new(FileSecretProvider::new(dir, config.secret_field.clone()))
            }
            None => {
                debug!("Reading secrets from the environment");
                Arc::new(EnvSecretProvider::new(config.secret_field.clone()))
            }
        };

        let conversation_store: Arc<dyn ConversationStore> = if config.memory_storage {
            debug!("Using in-memory conversation storage");
            Arc::new(InMemoryConversationStore::new())
        } else {
            let data_dir = config.resolved_data_dir();
            std::fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
            let db_path = config.database_path();
            debug!(
                "Using DuckDB conversation storage at {:?} table {}",
                db_path, config.store_table
            );
            Arc::new(DuckdbConversationStore::new(&db_path, &config.store_table)?)
        };

        let completion_client: Arc<dyn CompletionClient> =
            Arc::new(ReqwestCompletionClient::new(config.request_timeout())?);

        Ok(Self::with_components(
            config,
            secret_provider,
            conversation_store,
            completion_client,
        ))
    }

    /// Assemble a container from already-built collaborators.
    pub fn with_components(
        config: RelayConfig,
        secret_provider: Arc<dyn SecretProvider>,
        conversation_store: Arc<dyn ConversationStore>,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            secret_provider,
            conversation_store,
            completion_client,
            config,
        }
    }

    pub fn ask_question_use_case(&self) -> AskQuestionUseCase {
        AskQuestionUseCase::new(
            self.secret_provider.clone(),
            self.conversation_store.clone(),
            self.completion_client.clone(),
            &self.config,
        )
    }

    pub fn list_history_use_case(&self) -> ListHistoryUseCase {
        ListHistoryUseCase::new(self.conversation_store.clone())
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
