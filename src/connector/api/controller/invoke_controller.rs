use std::io::Read;

use anyhow::{Context, Result};

use crate::domain::InvocationEvent;

use super::super::{handle_event, CommandOutput, Container};

pub struct InvokeController<'a> {
    container: &'a Container,
}

impl<'a> InvokeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run one invocation. Flags take precedence over fields of the event file.
    ///
    /// The output is the `{statusCode, body}` JSON for every outcome; it is
    /// marked unsuccessful when the status is not 200.
    pub async fn invoke(
        &self,
        user_key: Option<String>,
        question: Option<String>,
        event_source: Option<String>,
    ) -> Result<CommandOutput> {
        let mut event = match event_source.as_deref() {
            Some(source) => read_event(source)?,
            None => InvocationEvent::default(),
        };
        if user_key.is_some() {
            event.user_key = user_key;
        }
        if question.is_some() {
            event.question = question;
        }

        let response = handle_event(self.container, event).await.into_response();
        let rendered = serde_json::to_string_pretty(&response)?;

        Ok(CommandOutput {
            text: rendered,
            success: response.status_code == 200,
        })
    }
}

fn read_event(source: &str) -> Result<InvocationEvent> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {}", source))?
    };

    if raw.trim().is_empty() {
        return Ok(InvocationEvent::default());
    }
    serde_json::from_str(&raw).with_context(|| format!("Invalid event JSON in {}", source))
}
