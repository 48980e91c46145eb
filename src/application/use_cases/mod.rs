mod ask_question;
mod list_history;

pub use ask_question::*;
pub use list_history::*;
