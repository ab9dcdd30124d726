//! Synthesized recommendation value objects

use crate::agent::role::AgentRole;
use serde::{Deserialize, Serialize};

/// An agent whose output backs the primary choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingFactor {
    pub agent_name: String,
    pub role: AgentRole,
    /// Shortened summary of the agent's payload
    pub excerpt: String,
}

/// Cross-agent output of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The leading suggestion, absent when no agent stated one
    pub primary_choice: Option<String>,
    /// Agent whose choice was selected
    pub chosen_by: Option<String>,
    /// Weighted confidence in `[0, 1]`
    pub aggregate_confidence: f64,
    pub supporting_factors: Vec<SupportingFactor>,
    /// Agents that stated a different choice
    pub dissenting_agents: Vec<String>,
    /// Risk flags raised by contributing agents, deduplicated
    pub risk_flags: Vec<String>,
    /// Highest risk score among contributing agents
    pub max_risk: f64,
    pub requires_approval: bool,
}

impl Recommendation {
    /// One-line description for logs and progress output.
    pub fn headline(&self) -> String {
        format!(
            "{} (confidence {:.2}{})",
            self.primary_choice.as_deref().unwrap_or("no recommendation"),
            self.aggregate_confidence,
            if self.requires_approval {
                ", approval required"
            } else {
                ""
            }
        )
    }
}
