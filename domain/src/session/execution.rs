//! Outcome of the post-approval execution step

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of running the execution collaborator once.
///
/// The artifact is opaque to the engine; it is stored and shown, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub artifact: Option<Value>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionOutcome {
    pub fn succeeded(started_at: DateTime<Utc>, artifact: Value) -> Self {
        Self {
            success: true,
            artifact: Some(artifact),
            error: None,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(started_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            artifact: None,
            error: Some(error.into()),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
