use serde_json::Value;

use crate::domain::DomainError;

/// Pull the answer text out of a chat completion response body.
///
/// Only `choices[0].message.content` is read. A body that is not JSON fails
/// with [`DomainError::MalformedResponse`]; valid JSON lacking any part of
/// that path (including an empty `choices` array) fails with
/// [`DomainError::MissingField`]. An empty string is a valid answer.
pub fn extract_answer(raw_body: &[u8]) -> Result<String, DomainError> {
    let value: Value = serde_json::from_slice(raw_body)
        .map_err(|e| DomainError::malformed_response(format!("body is not valid JSON: {e}")))?;

    let choices = value
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| DomainError::missing_field("choices"))?;

    let first = choices
        .first()
        .ok_or_else(|| DomainError::missing_field("choices[0]"))?;

    let message = first
        .get("message")
        .ok_or_else(|| DomainError::missing_field("choices[0].message"))?;

    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DomainError::missing_field("choices[0].message.content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_with_content(content: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({ "choices": [{ "message": { "content": content } }] })).unwrap()
    }

    #[test]
    fn extracts_first_choice_content() {
        let raw = br#"{"choices":[{"message":{"content":"Padre Island"}}]}"#;
        assert_eq!(extract_answer(raw).unwrap(), "Padre Island");
    }

    #[test]
    fn preserves_empty_and_special_character_content() {
        for content in ["", "quote \" brace { } bracket [ ]", "line\nbreak\ttab", "emoji 🌊 \\ slash"] {
            assert_eq!(extract_answer(&body_with_content(content)).unwrap(), content);
        }
    }

    #[test]
    fn ignores_additional_choices_and_fields() {
        let raw = br#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"one"}},{"message":{"content":"two"}}],"usage":{}}"#;
        assert_eq!(extract_answer(raw).unwrap(), "one");
    }

    #[test]
    fn empty_choices_is_missing_field() {
        let err = extract_answer(br#"{"choices":[]}"#).unwrap_err();
        assert!(err.is_missing_field(), "got {err:?}");
    }

    #[test]
    fn missing_path_segments_are_missing_field() {
        let cases: [&[u8]; 6] = [
            br#"{}"#,
            br#"{"choices":{}}"#,
            br#"{"choices":[{}]}"#,
            br#"{"choices":[{"message":{}}]}"#,
            br#"{"choices":[{"message":{"content":null}}]}"#,
            br#"[1,2,3]"#,
        ];
        for raw in cases {
            let err = extract_answer(raw).unwrap_err();
            assert!(err.is_missing_field(), "{}: got {err:?}", String::from_utf8_lossy(raw));
        }
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let cases: [&[u8]; 4] = [b"not json", b"", b"{\"choices\":", b"\xff\xfe"];
        for raw in cases {
            let err = extract_answer(raw).unwrap_err();
            assert!(err.is_malformed_response(), "got {err:?}");
        }
    }
}
