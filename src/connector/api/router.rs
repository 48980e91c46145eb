use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{HistoryController, InvokeController};

/// Text to print for a command, and whether the process should exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

pub struct Router<'a> {
    invoke_controller: InvokeController<'a>,
    history_controller: HistoryController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            invoke_controller: InvokeController::new(container),
            history_controller: HistoryController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<CommandOutput> {
        match command {
            Commands::Invoke {
                user_key,
                question,
                event,
            } => self.invoke_controller.invoke(user_key, question, event).await,
            Commands::History { user_key, json } => {
                let text = self.history_controller.history(user_key, json).await?;
                Ok(CommandOutput::ok(text))
            }
            Commands::Serve { .. } => unreachable!("Serve command is handled separately in main"),
        }
    }
}
