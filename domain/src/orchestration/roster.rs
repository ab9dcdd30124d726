//! Agent rosters
//!
//! A roster is the ordered list of phases an orchestrator runs. Agents in the
//! same phase run concurrently; phases run one after another.

use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// One named agent slot in a roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub role: AgentRole,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, role: AgentRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Agent named after its role.
    pub fn for_role(role: AgentRole) -> Self {
        Self::new(role.as_str(), role)
    }
}

/// The built-in rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    /// Database provisioning analysis
    #[default]
    Provisioning,
    /// NoSQL datastore selection
    Nosql,
    /// Incident response
    Incident,
}

impl RosterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterKind::Provisioning => "provisioning",
            RosterKind::Nosql => "nosql",
            RosterKind::Incident => "incident",
        }
    }

    pub fn roster(&self) -> Roster {
        match self {
            RosterKind::Provisioning => Roster::provisioning(),
            RosterKind::Nosql => Roster::nosql_selection(),
            RosterKind::Incident => Roster::incident_response(),
        }
    }
}

impl std::fmt::Display for RosterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RosterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "provisioning" | "database" => Ok(RosterKind::Provisioning),
            "nosql" | "nosql_selection" | "nosql-selection" => Ok(RosterKind::Nosql),
            "incident" | "incident_response" | "incident-response" => Ok(RosterKind::Incident),
            other => Err(format!("unknown roster: {}", other)),
        }
    }
}

/// Ordered agent phases fixed for one orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    name: String,
    phases: Vec<Vec<AgentSpec>>,
}

impl Roster {
    /// Build a roster, rejecting empty phases and duplicate agent names.
    pub fn new(name: impl Into<String>, phases: Vec<Vec<AgentSpec>>) -> Result<Self, DomainError> {
        let name = name.into();
        if phases.is_empty() {
            return Err(DomainError::InvalidRoster(format!("{}: no phases", name)));
        }

        let mut seen = HashSet::new();
        for (index, phase) in phases.iter().enumerate() {
            if phase.is_empty() {
                return Err(DomainError::InvalidRoster(format!(
                    "{}: phase {} has no agents",
                    name, index
                )));
            }
            for spec in phase {
                if !seen.insert(spec.name.as_str()) {
                    return Err(DomainError::InvalidRoster(format!(
                        "{}: duplicate agent name '{}'",
                        name, spec.name
                    )));
                }
            }
        }

        Ok(Self { name, phases })
    }

    pub fn provisioning() -> Self {
        Self::builtin(
            RosterKind::Provisioning,
            &[
                &[AgentRole::Workload],
                &[AgentRole::Cost, AgentRole::Security],
                &[AgentRole::Architecture],
            ],
        )
    }

    pub fn nosql_selection() -> Self {
        Self::builtin(
            RosterKind::Nosql,
            &[
                &[AgentRole::DataModel],
                &[AgentRole::Scalability, AgentRole::Cost],
                &[AgentRole::Architecture],
            ],
        )
    }

    pub fn incident_response() -> Self {
        Self::builtin(
            RosterKind::Incident,
            &[
                &[AgentRole::LogAnalysis, AgentRole::Metrics],
                &[AgentRole::RootCause],
                &[AgentRole::Remediation],
            ],
        )
    }

    fn builtin(kind: RosterKind, phases: &[&[AgentRole]]) -> Self {
        // Built-in rosters use one agent per role, so names never collide.
        Self {
            name: kind.as_str().to_string(),
            phases: phases
                .iter()
                .map(|roles| roles.iter().copied().map(AgentSpec::for_role).collect())
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Vec<AgentSpec>] {
        &self.phases
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn agent_count(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    pub fn agents(&self) -> impl Iterator<Item = (usize, &AgentSpec)> {
        self.phases
            .iter()
            .enumerate()
            .flat_map(|(i, phase)| phase.iter().map(move |spec| (i, spec)))
    }
}
