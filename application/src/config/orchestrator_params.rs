//! Orchestrator parameters: timeouts, concurrency and approval flow.
//!
//! [`OrchestratorParams`] groups the static parameters that control how the
//! [`AnalysisOrchestrator`](crate::use_cases::orchestrator::AnalysisOrchestrator)
//! runs sessions. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// What happens after synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// Always stop at `AWAITING_APPROVAL`
    #[default]
    Manual,
    /// Execute without a human when the recommendation does not require approval
    Auto,
}

impl ApprovalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalMode::Manual => "manual",
            ApprovalMode::Auto => "auto",
        }
    }
}

impl FromStr for ApprovalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(ApprovalMode::Manual),
            "auto" => Ok(ApprovalMode::Auto),
            other => Err(format!("unknown approval mode: {}", other)),
        }
    }
}

/// Orchestrator control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Hard timeout of one reasoning call.
    pub reasoning_timeout: Duration,
    /// Added to `reasoning_timeout` to form the per-phase barrier.
    pub phase_overhead: Duration,
    /// Upper bound on a whole analysis; `None` disables it.
    pub session_timeout: Option<Duration>,
    /// Upper bound on one call to the execution adapter.
    pub execution_timeout: Duration,
    /// Reasoning calls allowed in flight across all sessions.
    pub max_in_flight: usize,
    /// Maximum output tokens per reasoning call.
    pub max_tokens: u32,
    /// Sampling temperature per reasoning call.
    pub temperature: f32,
    pub approval_mode: ApprovalMode,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            reasoning_timeout: Duration::from_secs(30),
            phase_overhead: Duration::from_secs(5),
            session_timeout: Some(Duration::from_secs(600)),
            execution_timeout: Duration::from_secs(60),
            max_in_flight: 8,
            max_tokens: 1024,
            temperature: 0.2,
            approval_mode: ApprovalMode::Manual,
        }
    }
}

impl OrchestratorParams {
    /// Barrier after which agents still running in a phase become `ERROR`.
    pub fn phase_timeout(&self) -> Duration {
        self.reasoning_timeout.saturating_add(self.phase_overhead)
    }

    // ==================== Builder Methods ====================

    pub fn with_reasoning_timeout(mut self, timeout: Duration) -> Self {
        self.reasoning_timeout = timeout;
        self
    }

    pub fn with_phase_overhead(mut self, overhead: Duration) -> Self {
        self.phase_overhead = overhead;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_approval_mode(mut self, mode: ApprovalMode) -> Self {
        self.approval_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_timeout_adds_overhead() {
        let params = OrchestratorParams::default()
            .with_reasoning_timeout(Duration::from_secs(20))
            .with_phase_overhead(Duration::from_secs(3));
        assert_eq!(params.phase_timeout(), Duration::from_secs(23));
    }

    #[test]
    fn test_phase_timeout_saturates() {
        let params = OrchestratorParams::default().with_reasoning_timeout(Duration::MAX);
        assert_eq!(params.phase_timeout(), Duration::MAX);
    }

    #[test]
    fn test_approval_mode_parsing() {
        assert_eq!("AUTO".parse::<ApprovalMode>().unwrap(), ApprovalMode::Auto);
        assert_eq!(ApprovalMode::default(), ApprovalMode::Manual);
        assert!("sometimes".parse::<ApprovalMode>().is_err());
    }
}
