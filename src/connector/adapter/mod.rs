mod duckdb_conversation_store;
mod env_secret_provider;
mod file_secret_provider;
mod in_memory_conversation_store;
mod reqwest_completion_client;
mod secret_string;
mod static_secret_provider;

pub use duckdb_conversation_store::*;
pub use env_secret_provider::*;
pub use file_secret_provider::*;
pub use in_memory_conversation_store::*;
pub use reqwest_completion_client::*;
pub use secret_string::*;
pub use static_secret_provider::*;
