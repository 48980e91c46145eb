use serde_json::Value;

use crate::domain::DomainError;

/// Pick `field` out of a secret stored as a JSON object string, e.g.
/// `{"api-key-chatgpt": "sk-..."}`.
pub fn parse_secret_string(
    secret_name: &str,
    secret_string: &str,
    field: &str,
) -> Result<String, DomainError> {
    let value: Value = serde_json::from_str(secret_string.trim()).map_err(|e| {
        DomainError::secret_unavailable(format!(
            "secret '{secret_name}' is not a JSON object: {e}"
        ))
    })?;

    match value.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(DomainError::secret_unavailable(format!(
            "secret '{secret_name}' has an empty '{field}' field"
        ))),
        Some(_) => Err(DomainError::secret_unavailable(format!(
            "secret '{secret_name}' field '{field}' is not a string"
        ))),
        None => Err(DomainError::secret_unavailable(format!(
            "secret '{secret_name}' has no '{field}' field"
        ))),
    }
}
