//! Reasoning client port
//!
//! Defines how agents talk to the remote inference service.

use advisor_domain::{AgentRole, extract_json_object, missing_fields};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a reasoning call produced nothing usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningErrorKind {
    /// Endpoint unreachable, non-success status, or timed out
    Unavailable,
    /// Response did not parse against the requested schema
    Malformed,
}

/// Errors returned by a [`ReasoningClient`]
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind:?}: {message}")]
pub struct ReasoningError {
    pub kind: ReasoningErrorKind,
    pub message: String,
}

impl ReasoningError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ReasoningErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ReasoningErrorKind::Malformed,
            message: message.into(),
        }
    }
}

/// One request to the reasoning service
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub role: AgentRole,
    pub system_prompt: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Fields the response object must contain
    pub required_fields: &'static [&'static str],
}

/// A response that parsed against the requested schema
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningResponse {
    /// Response text exactly as received
    pub raw: String,
    /// The JSON object extracted from `raw`
    pub payload: Value,
}

impl ReasoningResponse {
    /// Strictly parse `raw` against `required_fields`.
    ///
    /// Adapters call this after receiving text so every client applies the
    /// same schema check.
    pub fn parse(raw: impl Into<String>, required_fields: &[&str]) -> Result<Self, ReasoningError> {
        let raw = raw.into();
        let object = extract_json_object(&raw)
            .ok_or_else(|| ReasoningError::malformed("response contains no JSON object"))?;
        let missing = missing_fields(&object, required_fields);
        if !missing.is_empty() {
            return Err(ReasoningError::malformed(format!(
                "response is missing field(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self {
            raw,
            payload: Value::Object(object),
        })
    }
}

/// Client for the remote reasoning service
///
/// Implementations make exactly one outbound call per invocation: no retries,
/// and no access to session state. They enforce their own hard timeout and
/// report it as [`ReasoningErrorKind::Unavailable`].
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn invoke(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ReasoningError>;
}
