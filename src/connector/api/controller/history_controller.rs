use anyhow::Result;

use crate::domain::ConversationTurn;

use super::super::Container;

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn history(&self, user_key: Option<String>, json: bool) -> Result<String> {
        let user_key = user_key.unwrap_or_else(|| self.container.config().default_user_key.clone());
        let use_case = self.container.list_history_use_case();
        let turns = use_case.execute(&user_key).await?;

        if json {
            return Ok(serde_json::to_string_pretty(&turns)?);
        }
        Ok(self.format_history(&user_key, &turns))
    }

    fn format_history(&self, user_key: &str, turns: &[ConversationTurn]) -> String {
        if turns.is_empty() {
            return format!("No conversation recorded for {}.", user_key);
        }

        let mut output = format!("Conversation for {} ({} turns):\n\n", user_key, turns.len());
        for turn in turns {
            output.push_str(&format!("[{}]\n", turn.date_time()));
            output.push_str(&format!("  Q: {}\n", turn.question()));
            output.push_str(&format!("  A: {}\n", turn.answer()));
            output.push('\n');
        }
        output
    }
}
