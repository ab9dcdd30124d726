//! Agent roles
//!
//! A role fixes what an agent is asked, which fields its payload must carry,
//! and how much weight its stated choice gets during synthesis.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of agent roles known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Characterises the workload (read/write mix, access pattern)
    Workload,
    /// Characterises the data shape for datastore selection
    DataModel,
    /// Estimates running cost of the candidate options
    Cost,
    /// Flags security and compliance risks
    Security,
    /// Assesses how the candidate scales
    Scalability,
    /// Makes the final technology decision from earlier findings
    Architecture,
    /// Extracts error patterns from logs
    LogAnalysis,
    /// Detects anomalies in metrics
    Metrics,
    /// Forms a root-cause hypothesis from log and metric findings
    RootCause,
    /// Proposes the remediation action
    Remediation,
}

impl AgentRole {
    pub const ALL: [AgentRole; 10] = [
        AgentRole::Workload,
        AgentRole::DataModel,
        AgentRole::Cost,
        AgentRole::Security,
        AgentRole::Scalability,
        AgentRole::Architecture,
        AgentRole::LogAnalysis,
        AgentRole::Metrics,
        AgentRole::RootCause,
        AgentRole::Remediation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Workload => "workload",
            AgentRole::DataModel => "data_model",
            AgentRole::Cost => "cost",
            AgentRole::Security => "security",
            AgentRole::Scalability => "scalability",
            AgentRole::Architecture => "architecture",
            AgentRole::LogAnalysis => "log_analysis",
            AgentRole::Metrics => "metrics",
            AgentRole::RootCause => "root_cause",
            AgentRole::Remediation => "remediation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Workload => "Workload Analyst",
            AgentRole::DataModel => "Data Model Analyst",
            AgentRole::Cost => "Cost Analyst",
            AgentRole::Security => "Security Reviewer",
            AgentRole::Scalability => "Scalability Reviewer",
            AgentRole::Architecture => "Solution Architect",
            AgentRole::LogAnalysis => "Log Analyst",
            AgentRole::Metrics => "Metrics Analyst",
            AgentRole::RootCause => "Root Cause Investigator",
            AgentRole::Remediation => "Remediation Planner",
        }
    }

    /// Rank used when choosing the primary recommendation (lower wins).
    ///
    /// Synthesis roles override cost, which overrides everything else.
    pub fn precedence(&self) -> u8 {
        match self {
            AgentRole::Architecture | AgentRole::Remediation => 0,
            AgentRole::Cost => 1,
            AgentRole::Workload
            | AgentRole::DataModel
            | AgentRole::Security
            | AgentRole::Scalability
            | AgentRole::LogAnalysis
            | AgentRole::Metrics
            | AgentRole::RootCause => 2,
        }
    }

    /// Fields the remote response must contain for this role.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            AgentRole::Workload => &[
                "confidence",
                "summary",
                "workload_type",
                "access_pattern",
                "suggested_engine",
            ],
            AgentRole::DataModel => &["confidence", "summary", "data_shape", "suggested_store"],
            AgentRole::Cost => &[
                "confidence",
                "summary",
                "recommended_option",
                "monthly_cost_usd",
            ],
            AgentRole::Security => &["confidence", "summary", "risk_score", "risk_flags"],
            AgentRole::Scalability => &["confidence", "summary", "scaling_strategy", "risk_score"],
            AgentRole::Architecture => &[
                "confidence",
                "summary",
                "recommended_technology",
                "rationale",
            ],
            AgentRole::LogAnalysis => &["confidence", "summary", "error_patterns", "severity"],
            AgentRole::Metrics => &["confidence", "summary", "anomalies"],
            AgentRole::RootCause => &["confidence", "summary", "probable_cause"],
            AgentRole::Remediation => &["confidence", "summary", "action", "risk_score", "steps"],
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown agent role: {}", s))
    }
}
