//! Orchestrator configuration from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Roster to run: "provisioning", "nosql" or "incident".
    pub roster: String,
    /// "manual" or "auto".
    pub approval_mode: String,
    /// Reasoning calls allowed in flight at once.
    pub max_in_flight: usize,
    /// Seconds added to the reasoning timeout to form the phase barrier.
    pub phase_overhead_seconds: u64,
    /// Upper bound on a whole analysis, in seconds.
    pub session_timeout_seconds: u64,
    /// Upper bound on one execution call, in seconds.
    pub execution_timeout_seconds: u64,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            roster: "provisioning".to_string(),
            approval_mode: "manual".to_string(),
            max_in_flight: 8,
            phase_overhead_seconds: 5,
            session_timeout_seconds: 600,
            execution_timeout_seconds: 60,
        }
    }
}
