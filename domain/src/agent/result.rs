//! Agent results

use crate::agent::payload::AgentPayload;
use crate::agent::role::AgentRole;
use crate::orchestration::roster::AgentSpec;
use serde::{Deserialize, Serialize};

/// How an agent's contribution was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    /// Remote reasoning succeeded and the payload passed validation
    Ok,
    /// Remote reasoning failed or was unusable; a deterministic default was used
    Fallback,
    /// No contribution (missed the phase barrier or the task died)
    Error,
}

impl AgentStatus {
    /// Weight of this status in the aggregate confidence.
    pub fn weight(&self) -> f64 {
        match self {
            AgentStatus::Ok => 1.0,
            AgentStatus::Fallback => 0.5,
            AgentStatus::Error => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Ok => "OK",
            AgentStatus::Fallback => "FALLBACK",
            AgentStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of one agent's execution within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_name: String,
    pub role: AgentRole,
    /// 0-based phase index
    pub phase: usize,
    pub status: AgentStatus,
    /// Absent only for `ERROR` results
    pub payload: Option<AgentPayload>,
    /// Prompt sent to the reasoning service, kept verbatim
    pub raw_request: Option<String>,
    /// Response text received, kept verbatim
    pub raw_response: Option<String>,
    /// Why the agent fell back or errored
    pub failure: Option<String>,
    pub duration_ms: u64,
}

impl AgentResult {
    pub fn ok(spec: &AgentSpec, phase: usize, payload: AgentPayload) -> Self {
        Self {
            agent_name: spec.name.clone(),
            role: spec.role,
            phase,
            status: AgentStatus::Ok,
            payload: Some(payload),
            raw_request: None,
            raw_response: None,
            failure: None,
            duration_ms: 0,
        }
    }

    pub fn fallback(
        spec: &AgentSpec,
        phase: usize,
        payload: AgentPayload,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            status: AgentStatus::Fallback,
            failure: Some(reason.into()),
            ..Self::ok(spec, phase, payload)
        }
    }

    pub fn error(spec: &AgentSpec, phase: usize, reason: impl Into<String>) -> Self {
        Self {
            agent_name: spec.name.clone(),
            role: spec.role,
            phase,
            status: AgentStatus::Error,
            payload: None,
            raw_request: None,
            raw_response: None,
            failure: Some(reason.into()),
            duration_ms: 0,
        }
    }

    pub fn with_exchange(mut self, request: Option<String>, response: Option<String>) -> Self {
        self.raw_request = request;
        self.raw_response = response;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Reported confidence, or 0 when no payload exists.
    pub fn confidence(&self) -> f64 {
        self.payload.as_ref().map(|p| p.confidence).unwrap_or(0.0)
    }

    pub fn summary(&self) -> Option<&str> {
        self.payload.as_ref().map(|p| p.summary.as_str())
    }

    pub fn is_ok(&self) -> bool {
        self.status == AgentStatus::Ok
    }
}
