//! Output sanitizer for LLM responses.
//!
//! Models frequently wrap JSON in markdown fences or surround it with prose
//! even when told not to. Everything that crosses the LLM boundary goes
//! through `sanitize` before any field is trusted.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// A response that could not be reduced to valid JSON.
/// Recoverable at the node level: the caller decides whether the field was
/// load-bearing enough to end the pipeline.
#[derive(Debug, Clone, Error)]
#[error("LLM output was not valid JSON: {reason}")]
pub struct ParseFailure {
    pub reason: String,
    pub raw_text: String,
}

/// Strips code fences and surrounding prose, then parses the single
/// top-level JSON object (or array) that remains.
pub fn sanitize(raw_text: &str) -> Result<serde_json::Value, ParseFailure> {
    let candidate = isolate_json(raw_text);
    serde_json::from_str(candidate).map_err(|e| ParseFailure {
        reason: e.to_string(),
        raw_text: raw_text.to_string(),
    })
}

/// `sanitize` plus deserialization into the expected result shape.
/// A structurally valid JSON object that does not match the schema is still
/// a parse failure — fields are validated, never parse-and-hoped.
pub fn sanitize_into<T: DeserializeOwned>(raw_text: &str) -> Result<T, ParseFailure> {
    let value = sanitize(raw_text)?;
    serde_json::from_value(value).map_err(|e| ParseFailure {
        reason: e.to_string(),
        raw_text: raw_text.to_string(),
    })
}

/// Trims fence markers, then narrows to the outermost `{...}` or `[...]`
/// span so leading/trailing prose does not break the parse.
fn isolate_json(text: &str) -> &str {
    let text = strip_fences(text);
    let object_span = span(text, '{', '}');
    let array_span = span(text, '[', ']');
    match (object_span, array_span) {
        // Prefer whichever delimiter opens first: an object mentioned inside
        // a prose sentence after an array (or vice versa) must not win.
        (Some((os, oe)), Some((as_, ae))) => {
            if os <= as_ {
                &text[os..=oe]
            } else {
                &text[as_..=ae]
            }
        }
        (Some((start, end)), None) | (None, Some((start, end))) => &text[start..=end],
        (None, None) => text,
    }
}

fn span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}

fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(prefix) {
            let stripped = stripped.trim_start();
            return stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        answer: String,
    }

    #[test]
    fn test_plain_json_passes_through() {
        let value = sanitize(r#"{"answer": "yes"}"#).unwrap();
        assert_eq!(value["answer"], "yes");
    }

    #[test]
    fn test_strips_json_fence() {
        let value = sanitize("```json\n{\"answer\": \"yes\"}\n```").unwrap();
        assert_eq!(value["answer"], "yes");
    }

    #[test]
    fn test_strips_bare_fence() {
        let value = sanitize("```\n{\"answer\": \"yes\"}\n```").unwrap();
        assert_eq!(value["answer"], "yes");
    }

    #[test]
    fn test_strips_leading_and_trailing_prose() {
        let raw = "Sure! Here is the JSON you asked for:\n{\"answer\": \"yes\"}\nLet me know if you need anything else.";
        let value = sanitize(raw).unwrap();
        assert_eq!(value["answer"], "yes");
    }

    #[test]
    fn test_prose_and_fences_combined() {
        let raw = "Here you go:\n```json\n{\"answer\": \"yes\"}\n```\nHope that helps!";
        let value = sanitize(raw).unwrap();
        assert_eq!(value["answer"], "yes");
    }

    #[test]
    fn test_top_level_array() {
        let value = sanitize("The skills are:\n[\"rust\", \"sql\"]").unwrap();
        assert_eq!(value[0], "rust");
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        let raw = "I am unable to answer that.";
        let err = sanitize(raw).unwrap_err();
        assert_eq!(err.raw_text, raw);
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_sanitize_into_typed() {
        let parsed: Sample = sanitize_into("```json\n{\"answer\": \"42\"}\n```").unwrap();
        assert_eq!(parsed.answer, "42");
    }

    #[test]
    fn test_sanitize_into_schema_mismatch_is_failure() {
        let err = sanitize_into::<Sample>(r#"{"unexpected": true}"#).unwrap_err();
        assert!(err.reason.contains("answer") || !err.reason.is_empty());
    }

    #[test]
    fn test_nested_braces_survive() {
        let raw = "Result: {\"outer\": {\"inner\": [1, 2]}} done";
        let value = sanitize(raw).unwrap();
        assert_eq!(value["outer"]["inner"][1], 2);
    }
}
