//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CHATRELAY_*` environment variables. [`RelayConfig::validate`] runs last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::DomainError;

pub const ENV_PREFIX: &str = "CHATRELAY_";

pub const DEFAULT_SECRET_NAME: &str = "prod/api/key/chatgpt";
pub const DEFAULT_SECRET_FIELD: &str = "api-key-chatgpt";
pub const DEFAULT_STORE_TABLE: &str = "Video-000200-UserConversation";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_SYSTEM_PREAMBLE: &str =
    "You are an assistant who answers questions about the world.";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_KEY: &str = "demoUser";
pub const DEFAULT_QUESTION: &str = "Where is the best surfing location in Texas?";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Successful API call to the completion endpoint!";
pub const DEFAULT_DATA_DIR: &str = "~/.chatrelay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Logical name of the secret holding the completion API key.
    pub secret_name: String,
    /// Field inside the JSON secret string that carries the key.
    pub secret_field: String,
    pub store_table: String,
    pub completion_url: String,
    pub model: String,
    pub temperature: f32,
    pub system_preamble: String,
    /// Upper bound on the whole completion call. No retries are made.
    pub request_timeout_secs: u64,
    /// User identity when the invocation event does not name one.
    pub default_user_key: String,
    /// Question asked when the invocation event does not carry one.
    pub default_question: String,
    pub success_message: String,
    pub data_dir: String,
    /// Keep conversation turns in memory instead of DuckDB.
    pub memory_storage: bool,
    /// Read secrets from files under this directory instead of the environment.
    pub secrets_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            secret_field: DEFAULT_SECRET_FIELD.to_string(),
            store_table: DEFAULT_STORE_TABLE.to_string(),
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_preamble: DEFAULT_SYSTEM_PREAMBLE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_user_key: DEFAULT_USER_KEY.to_string(),
            default_question: DEFAULT_QUESTION.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            memory_storage: false,
            secrets_dir: None,
        }
    }
}

impl RelayConfig {
    /// Load defaults, the optional TOML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::config(format!("Invalid configuration file: {}", e)))
    }

    /// Apply `CHATRELAY_*` overrides using `lookup` to resolve variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = get("SECRET_NAME") {
            self.secret_name = v;
        }
        if let Some(v) = get("SECRET_FIELD") {
            self.secret_field = v;
        }
        if let Some(v) = get("STORE_TABLE") {
            self.store_table = v;
        }
        if let Some(v) = get("COMPLETION_URL") {
            self.completion_url = v;
        }
        if let Some(v) = get("MODEL") {
            self.model = v;
        }
        if let Some(v) = get("TEMPERATURE") {
            self.temperature = parse_value("TEMPERATURE", &v)?;
        }
        if let Some(v) = get("SYSTEM_PREAMBLE") {
            self.system_preamble = v;
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_value("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("DEFAULT_USER_KEY") {
            self.default_user_key = v;
        }
        if let Some(v) = get("DEFAULT_QUESTION") {
            self.default_question = v;
        }
        if let Some(v) = get("SUCCESS_MESSAGE") {
            self.success_message = v;
        }
        if let Some(v) = get("DATA_DIR") {
            self.data_dir = v;
        }
        if let Some(v) = get("MEMORY_STORAGE") {
            self.memory_storage = parse_value("MEMORY_STORAGE", &v)?;
        }
        if let Some(v) = get("SECRETS_DIR") {
            self.secrets_dir = Some(PathBuf::from(v));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.secret_name.trim().is_empty() {
            return Err(DomainError::config("secret_name must not be empty"));
        }
        if self.secret_field.trim().is_empty() {
            return Err(DomainError::config("secret_field must not be empty"));
        }
        if !is_valid_table_name(&self.store_table) {
            return Err(DomainError::config(format!(
                "store_table '{}' must be 3-255 characters of [A-Za-z0-9_.-]",
                self.store_table
            )));
        }
        if !(self.completion_url.starts_with("https://")
            || self.completion_url.starts_with("http://"))
        {
            return Err(DomainError::config(format!(
                "completion_url '{}' must be an http(s) URL",
                self.completion_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(DomainError::config("model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::config(format!(
                "temperature {} must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DomainError::config("request_timeout_secs must be positive"));
        }
        if self.default_user_key.trim().is_empty() {
            return Err(DomainError::config("default_user_key must not be empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `data_dir` with a leading `~` expanded to `$HOME`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.data_dir))
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolved_data_dir().join("chatrelay.duckdb")
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DomainError::config(format!("{ENV_PREFIX}{name}='{raw}': {e}")))
}

/// Table names follow the DynamoDB rules: 3-255 characters of `[A-Za-z0-9_.-]`.
pub fn is_valid_table_name(name: &str) -> bool {
    (3..=255).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
