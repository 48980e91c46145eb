mod completion_client;
mod conversation_store;
mod secret_provider;

pub use completion_client::*;
pub use conversation_store::*;
pub use secret_provider::*;
