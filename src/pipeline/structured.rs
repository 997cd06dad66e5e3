//! Parsing of the model's structured-extraction reply.
//!
//! The reply must be a single JSON object. Anything else fails with
//! [`ScreenError::ExtractionParse`] carrying the raw text: markdown fences,
//! leading prose and trailing commentary are not stripped or repaired.

use crate::error::ScreenError;
use crate::model::StructuredResume;
use serde_json::Value;

/// Parse the raw model output into a [`StructuredResume`].
pub fn parse_structured(raw: &str) -> Result<StructuredResume, ScreenError> {
    let fail = |detail: String| ScreenError::ExtractionParse {
        detail,
        raw: raw.to_string(),
    };

    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| fail(e.to_string()))?;
    if !value.is_object() {
        return Err(fail(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| fail(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_object() {
        let r = parse_structured(r#"{"name":"Jane"}"#).unwrap();
        assert_eq!(r.get("name").as_deref(), Some("Jane"));
    }

    #[test]
    fn surrounding_whitespace_is_fine() {
        let r = parse_structured("\n  {\"email\": \"jane@example.com\"}\n").unwrap();
        assert_eq!(r.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn plain_text_fails_with_raw_output() {
        let err = parse_structured("not json").unwrap_err();
        match err {
            ScreenError::ExtractionParse { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fenced_json_is_not_repaired() {
        let raw = "```json\n{\"name\":\"Jane\"}\n```";
        let err = parse_structured(raw).unwrap_err();
        assert_eq!(err.raw_detail(), Some(raw));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = parse_structured(r#"["Jane", "Doe"]"#).unwrap_err();
        assert!(err.to_string().contains("an array"), "got: {err}");
    }
}
