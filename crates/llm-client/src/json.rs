//! Best-effort JSON extraction from model output.
//!
//! Models asked for JSON often wrap it in markdown fences or add a sentence
//! before it, and that sentence may itself contain brackets. We try every
//! `{` or `[` from left to right and keep the first value serde accepts as
//! `T`; shape validation beyond that stays with the caller.

use serde::de::DeserializeOwned;
use serde_json::Deserializer;

use crate::{LlmClientError, Result};

/// Byte offsets where a JSON object or array could start
fn candidate_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.match_indices(['{', '[']).map(|(start, _)| start)
}

/// Extract and deserialize JSON from model output.
///
/// Text after the first complete value is ignored. When no candidate
/// deserializes, the error from the first one is reported.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let mut first_error = None;

    for start in candidate_starts(text) {
        let mut values = Deserializer::from_str(&text[start..]).into_iter::<T>();
        match values.next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            None => {}
        }
    }

    Err(LlmClientError::InvalidResponse(
        first_error.unwrap_or_else(|| "no JSON found in output".to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    #[test]
    fn test_plain_object() {
        let value: Value = parse_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_object() {
        let text = "Here you go:\n```json\n{\"1\": []}\n```\nEnjoy!";
        let value: Map<String, Value> = parse_json(text).unwrap();
        assert!(value.contains_key("1"));
    }

    #[test]
    fn test_bracketed_preamble_before_object() {
        let text = "Plan for waiters [1, 2]:\n```json\n{\"1\": [], \"2\": []}\n```";
        let plan: Map<String, Value> = parse_json(text).unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.contains_key("2"));
    }

    #[test]
    fn test_braced_preamble_before_array() {
        let text = "Using {diner} notes: [\"window seat\"]";
        let prefs: Vec<String> = parse_json(text).unwrap();
        assert_eq!(prefs, vec!["window seat"]);
    }

    #[test]
    fn test_array_before_object() {
        let text = r#"["quiet table", {"note": "window"}]"#;
        let value: Vec<Value> = parse_json(text).unwrap();
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn test_no_json() {
        let err = parse_json::<Value>("nothing to see").unwrap_err();
        assert!(matches!(err, LlmClientError::InvalidResponse(ref m) if m.contains("no JSON")));
    }

    #[test]
    fn test_truncated_json_is_invalid() {
        let err = parse_json::<Value>(r#"{"1": [{"diner_name": "A""#).unwrap_err();
        assert!(matches!(err, LlmClientError::InvalidResponse(_)));
    }
}
