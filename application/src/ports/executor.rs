//! Executor port
//!
//! The post-approval action: template generation, remediation dispatch, or
//! anything else that turns a recommendation into a real-world effect.

use advisor_domain::{Recommendation, SessionId};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by an [`ExecutionPort`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Execution failed: {0}")]
    Failed(String),

    #[error("Execution transport error: {0}")]
    Transport(String),

    #[error("Nothing to execute: {0}")]
    NothingToExecute(String),
}

/// Opaque output of a successful execution, stored but never interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionArtifact(pub Value);

impl ExecutionArtifact {
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Runs the approved recommendation.
///
/// Called at most once per session; failures are recorded, never retried.
#[async_trait]
pub trait ExecutionPort: Send + Sync {
    async fn execute(
        &self,
        session_id: SessionId,
        recommendation: &Recommendation,
    ) -> Result<ExecutionArtifact, ExecutionError>;
}
