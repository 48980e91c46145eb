mod chat_message;
mod conversation_turn;
mod invocation;

pub use chat_message::*;
pub use conversation_turn::*;
pub use invocation::*;
