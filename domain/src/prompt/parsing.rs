//! Response parsing for agent replies.
//!
//! Extracts the JSON object an agent was asked to produce from free-form
//! reasoning output. Pure text handling, no I/O.

use serde_json::{Map, Value};

/// Extract the first JSON object from `response`.
///
/// Accepts a bare object, an object wrapped in a ```json fence, or an object
/// surrounded by prose. Takes everything from the first `{` to the last `}`.
pub fn extract_json_object(response: &str) -> Option<Map<String, Value>> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&response[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Names from `required` that are missing (or null) in `object`.
pub fn missing_fields<'a>(object: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| object.get(*field).is_none_or(Value::is_null))
        .collect()
}
