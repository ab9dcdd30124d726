//! Analysis input value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form key/value requirements supplied by the caller.
///
/// Keys are kept sorted so that prompts and fallback payloads built from the
/// same input are byte-identical across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisInput(BTreeMap<String, Value>);

impl AnalysisInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(DomainError::InvalidInput(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Read a list of strings. A bare string counts as a one-element list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Read an object of numeric readings, ignoring non-numeric entries.
    pub fn get_numbers(&self, key: &str) -> BTreeMap<String, f64> {
        match self.get(key) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Pretty JSON rendering used when embedding the input into prompts.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

fn kind_of(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(AnalysisInput::from_value(json!({"a": 1})).is_ok());
        let err = AnalysisInput::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_get_list_accepts_string_or_array() {
        let input = AnalysisInput::new()
            .with("compliance", json!(["HIPAA", "SOC2"]))
            .with("region", "eu-west-1");
        assert_eq!(input.get_list("compliance"), vec!["HIPAA", "SOC2"]);
        assert_eq!(input.get_list("region"), vec!["eu-west-1"]);
        assert!(input.get_list("missing").is_empty());
    }

    #[test]
    fn test_pretty_json_is_key_ordered() {
        let a = AnalysisInput::new().with("zeta", 1).with("alpha", 2);
        let b = AnalysisInput::new().with("alpha", 2).with("zeta", 1);
        assert_eq!(a.to_pretty_json(), b.to_pretty_json());
        assert!(a.to_pretty_json().find("alpha") < a.to_pretty_json().find("zeta"));
    }

    #[test]
    fn test_get_numbers_skips_non_numeric() {
        let input = AnalysisInput::new().with("metrics", json!({"cpu": 91.5, "host": "a"}));
        let numbers = input.get_numbers("metrics");
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers["cpu"], 91.5);
    }
}
