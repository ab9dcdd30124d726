//! Agent payloads
//!
//! Every agent emits a [`AgentPayload`]: the common `confidence` / `summary`
//! pair plus a [`RoleDetails`] variant specific to its role. Synthesis matches
//! on the variant, so adding a role forces every consumer to handle it.

use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadAssessment {
    pub workload_type: String,
    pub access_pattern: String,
    pub suggested_engine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModelAssessment {
    pub data_shape: String,
    pub suggested_store: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub recommended_option: String,
    pub monthly_cost_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReview {
    pub risk_score: f64,
    pub risk_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalabilityReview {
    pub scaling_strategy: String,
    pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureDecision {
    pub recommended_technology: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFindings {
    pub error_patterns: Vec<String>,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFindings {
    pub anomalies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCauseHypothesis {
    pub probable_cause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationPlan {
    pub action: String,
    pub risk_score: f64,
    pub steps: Vec<String>,
}

/// Role-specific part of a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Workload(WorkloadAssessment),
    DataModel(DataModelAssessment),
    Cost(CostEstimate),
    Security(SecurityReview),
    Scalability(ScalabilityReview),
    Architecture(ArchitectureDecision),
    LogAnalysis(LogFindings),
    Metrics(MetricFindings),
    RootCause(RootCauseHypothesis),
    Remediation(RemediationPlan),
}

impl RoleDetails {
    /// Decode the role-specific fields from a flat JSON object.
    pub fn from_value(role: AgentRole, value: &Value) -> Result<Self, DomainError> {
        let details = match role {
            AgentRole::Workload => RoleDetails::Workload(decode(role, value)?),
            AgentRole::DataModel => RoleDetails::DataModel(decode(role, value)?),
            AgentRole::Cost => RoleDetails::Cost(decode(role, value)?),
            AgentRole::Security => RoleDetails::Security(decode(role, value)?),
            AgentRole::Scalability => RoleDetails::Scalability(decode(role, value)?),
            AgentRole::Architecture => RoleDetails::Architecture(decode(role, value)?),
            AgentRole::LogAnalysis => RoleDetails::LogAnalysis(decode(role, value)?),
            AgentRole::Metrics => RoleDetails::Metrics(decode(role, value)?),
            AgentRole::RootCause => RoleDetails::RootCause(decode(role, value)?),
            AgentRole::Remediation => RoleDetails::Remediation(decode(role, value)?),
        };
        details.validate()?;
        Ok(details)
    }

    pub fn role(&self) -> AgentRole {
        match self {
            RoleDetails::Workload(_) => AgentRole::Workload,
            RoleDetails::DataModel(_) => AgentRole::DataModel,
            RoleDetails::Cost(_) => AgentRole::Cost,
            RoleDetails::Security(_) => AgentRole::Security,
            RoleDetails::Scalability(_) => AgentRole::Scalability,
            RoleDetails::Architecture(_) => AgentRole::Architecture,
            RoleDetails::LogAnalysis(_) => AgentRole::LogAnalysis,
            RoleDetails::Metrics(_) => AgentRole::Metrics,
            RoleDetails::RootCause(_) => AgentRole::RootCause,
            RoleDetails::Remediation(_) => AgentRole::Remediation,
        }
    }

    /// The concrete suggestion this payload makes, if its role states one.
    pub fn choice(&self) -> Option<&str> {
        let choice = match self {
            RoleDetails::Workload(w) => w.suggested_engine.as_str(),
            RoleDetails::DataModel(d) => d.suggested_store.as_str(),
            RoleDetails::Cost(c) => c.recommended_option.as_str(),
            RoleDetails::Architecture(a) => a.recommended_technology.as_str(),
            RoleDetails::RootCause(r) => r.probable_cause.as_str(),
            RoleDetails::Remediation(r) => r.action.as_str(),
            RoleDetails::Security(_)
            | RoleDetails::Scalability(_)
            | RoleDetails::LogAnalysis(_)
            | RoleDetails::Metrics(_) => return None,
        };
        let choice = choice.trim();
        (!choice.is_empty()).then_some(choice)
    }

    /// Risk in `[0, 1]` flagged by this payload. Roles that do not assess risk report 0.
    pub fn risk_score(&self) -> f64 {
        match self {
            RoleDetails::Security(s) => s.risk_score,
            RoleDetails::Scalability(s) => s.risk_score,
            RoleDetails::Remediation(r) => r.risk_score,
            _ => 0.0,
        }
    }

    /// Human-readable risk flags carried by this payload.
    pub fn risk_flags(&self) -> &[String] {
        match self {
            RoleDetails::Security(s) => &s.risk_flags,
            RoleDetails::Metrics(m) => &m.anomalies,
            _ => &[],
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        let risk = self.risk_score();
        if !(0.0..=1.0).contains(&risk) {
            return Err(DomainError::ValidationFailed(format!(
                "{}: risk_score {} outside [0, 1]",
                self.role(),
                risk
            )));
        }
        match self {
            RoleDetails::Cost(c) if !c.monthly_cost_usd.is_finite() || c.monthly_cost_usd < 0.0 => {
                Err(DomainError::ValidationFailed(format!(
                    "cost: monthly_cost_usd {} must be a non-negative amount",
                    c.monthly_cost_usd
                )))
            }
            RoleDetails::Workload(_)
            | RoleDetails::DataModel(_)
            | RoleDetails::Cost(_)
            | RoleDetails::Architecture(_)
            | RoleDetails::RootCause(_)
            | RoleDetails::Remediation(_)
                if self.choice().is_none() =>
            {
                Err(DomainError::ValidationFailed(format!(
                    "{}: stated choice is empty",
                    self.role()
                )))
            }
            _ => Ok(()),
        }
    }
}

fn decode<T: DeserializeOwned>(role: AgentRole, value: &Value) -> Result<T, DomainError> {
    serde_json::from_value(value.clone())
        .map_err(|e| DomainError::ValidationFailed(format!("{}: {}", role, e)))
}

/// Structured output of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPayload {
    /// Self-reported confidence in `[0, 1]`
    pub confidence: f64,
    pub summary: String,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl AgentPayload {
    pub fn new(confidence: f64, summary: impl Into<String>, details: RoleDetails) -> Self {
        Self {
            confidence,
            summary: summary.into(),
            details,
        }
    }

    /// Validate a parsed remote response against the contract of `role`.
    pub fn from_response(role: AgentRole, value: &Value) -> Result<Self, DomainError> {
        let confidence = value
            .get("confidence")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                DomainError::ValidationFailed(format!("{}: confidence is not a number", role))
            })?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::ValidationFailed(format!(
                "{}: confidence {} outside [0, 1]",
                role, confidence
            )));
        }

        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::ValidationFailed(format!("{}: summary is empty", role)))?;

        let details = RoleDetails::from_value(role, value)?;
        Ok(Self::new(confidence, summary, details))
    }

    pub fn role(&self) -> AgentRole {
        self.details.role()
    }
}
