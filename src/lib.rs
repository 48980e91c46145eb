pub mod application;
pub mod cli;
pub mod config;
pub mod connector;
pub mod domain;

pub use application::{
    AskQuestionUseCase, CompletionClient, CompletionHttpResponse, ConversationStore,
    ListHistoryUseCase, PipelineFailure, SecretProvider,
};

pub use cli::Commands;

pub use config::RelayConfig;

pub use connector::{
    handle_event, CommandOutput, Container, DuckdbConversationStore, EnvSecretProvider, FileSecretProvider,
    InMemoryConversationStore, ReqwestCompletionClient, Router, StaticSecretProvider,
};

pub use domain::{
    extract_answer, ChatMessage, CompletionRequest, ConversationTurn, DomainError, ErrorKind,
    InvocationEvent, InvocationOutcome, InvocationResponse, PromptBuilder, Role, Stage,
};
