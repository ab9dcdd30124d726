//! Session entity

use crate::agent::result::AgentResult;
use crate::core::error::DomainError;
use crate::core::input::AnalysisInput;
use crate::session::execution::ExecutionOutcome;
use crate::session::state::SessionState;
use crate::synthesis::recommendation::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Effect of applying a human decision to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionEffect {
    /// Approved: the caller must run the executor exactly once
    Execute,
    /// Rejected: terminal, nothing to run
    Rejected,
    /// Same decision already recorded; nothing changed
    Unchanged,
}

/// One end-to-end analysis request.
///
/// Fields are private so that every mutation goes through a method that
/// checks the lifecycle rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    roster: String,
    input: AnalysisInput,
    state: SessionState,
    agent_results: Vec<AgentResult>,
    recommendation: Option<Recommendation>,
    execution_outcome: Option<ExecutionOutcome>,
    decision: Option<bool>,
    failure: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(roster: impl Into<String>, input: AnalysisInput) -> Self {
        Self {
            id: SessionId::new(),
            roster: roster.into(),
            input,
            state: SessionState::Created,
            agent_results: Vec::new(),
            recommendation: None,
            execution_outcome: None,
            decision: None,
            failure: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn roster(&self) -> &str {
        &self.roster
    }

    pub fn input(&self) -> &AnalysisInput {
        &self.input
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Results in phase order; within a phase, in completion order.
    pub fn agent_results(&self) -> &[AgentResult] {
        &self.agent_results
    }

    pub fn result(&self, agent_name: &str) -> Option<&AgentResult> {
        self.agent_results.iter().find(|r| r.agent_name == agent_name)
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn execution_outcome(&self) -> Option<&ExecutionOutcome> {
        self.execution_outcome.as_ref()
    }

    /// Recorded human (or automatic) decision, if any.
    pub fn decision(&self) -> Option<bool> {
        self.decision
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    // ==================== Mutations ====================

    /// Move to `next`, refusing anything the lifecycle does not allow.
    pub fn transition(&mut self, next: SessionState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                session: self.id.to_string(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Append one phase's results. Results are never replaced or removed.
    pub fn record_results(
        &mut self,
        results: impl IntoIterator<Item = AgentResult>,
    ) -> Result<(), DomainError> {
        self.require(SessionState::Analyzing, "record agent results")?;
        let results: Vec<AgentResult> = results.into_iter().collect();
        for (i, result) in results.iter().enumerate() {
            let clashes_with_batch = results[..i].iter().any(|r| r.agent_name == result.agent_name);
            if clashes_with_batch || self.result(&result.agent_name).is_some() {
                return Err(DomainError::DuplicateResult {
                    session: self.id.to_string(),
                    agent: result.agent_name.clone(),
                });
            }
        }
        self.agent_results.extend(results);
        Ok(())
    }

    /// Store the synthesized recommendation. Allowed exactly once.
    pub fn set_recommendation(&mut self, recommendation: Recommendation) -> Result<(), DomainError> {
        self.require(SessionState::Analyzing, "store a recommendation")?;
        if self.recommendation.is_some() {
            return Err(DomainError::RecommendationAlreadySet(self.id.to_string()));
        }
        self.recommendation = Some(recommendation);
        Ok(())
    }

    /// Approve without a human, used by auto-approval flows.
    pub fn auto_approve(&mut self) -> Result<(), DomainError> {
        self.transition(SessionState::Approved)?;
        self.transition(SessionState::Executing)?;
        self.decision = Some(true);
        Ok(())
    }

    /// Apply a human decision.
    ///
    /// Repeating the decision already recorded is a no-op so that client
    /// retries are harmless. Anything else outside `AWAITING_APPROVAL` fails.
    pub fn decide(&mut self, approved: bool) -> Result<DecisionEffect, DomainError> {
        if self.state == SessionState::AwaitingApproval {
            if approved {
                self.transition(SessionState::Approved)?;
                self.transition(SessionState::Executing)?;
                self.decision = Some(true);
                return Ok(DecisionEffect::Execute);
            }
            self.transition(SessionState::Rejected)?;
            self.decision = Some(false);
            return Ok(DecisionEffect::Rejected);
        }

        if self.decision == Some(approved) {
            return Ok(DecisionEffect::Unchanged);
        }

        Err(DomainError::InvalidState {
            session: self.id.to_string(),
            state: self.state,
            operation: "decide",
        })
    }

    /// Record the executor's outcome and finish the session.
    pub fn record_execution(&mut self, outcome: ExecutionOutcome) -> Result<(), DomainError> {
        self.require(SessionState::Executing, "record an execution outcome")?;
        let next = if outcome.success {
            SessionState::Completed
        } else {
            SessionState::Failed
        };
        if let Some(error) = &outcome.error {
            self.failure = Some(error.clone());
        }
        self.execution_outcome = Some(outcome);
        self.transition(next)
    }

    /// Fail a session that is still analyzing.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition(SessionState::Failed)?;
        self.failure = Some(reason.into());
        Ok(())
    }

    fn require(&self, state: SessionState, operation: &'static str) -> Result<(), DomainError> {
        if self.state != state {
            return Err(DomainError::InvalidState {
                session: self.id.to_string(),
                state: self.state,
                operation,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::fallback::fallback_payload;
    use crate::agent::role::AgentRole;
    use crate::orchestration::context::AnalysisContext;
    use crate::orchestration::roster::AgentSpec;
    use crate::synthesis::synthesizer::Synthesizer;

    fn analyzing() -> Session {
        let mut session = Session::new("provisioning", AnalysisInput::new());
        session.transition(SessionState::Analyzing).unwrap();
        session
    }

    fn result(name: &str) -> AgentResult {
        let spec = AgentSpec::new(name, AgentRole::Workload);
        AgentResult::ok(
            &spec,
            0,
            fallback_payload(AgentRole::Workload, &AnalysisContext::default()),
        )
    }

    fn awaiting() -> Session {
        let mut session = analyzing();
        session.record_results([result("workload")]).unwrap();
        let rec = Synthesizer::default().synthesize(session.agent_results());
        session.set_recommendation(rec).unwrap();
        session.transition(SessionState::AwaitingApproval).unwrap();
        session
    }

    #[test]
    fn test_session_id_parses_from_display() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("nope".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_records_are_append_only() {
        let mut session = analyzing();
        session.record_results([result("a"), result("b")]).unwrap();
        let err = session.record_results([result("c"), result("a")]).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateResult { .. }));
        // A rejected batch leaves earlier entries untouched.
        assert_eq!(session.agent_results().len(), 2);
    }

    #[test]
    fn test_duplicate_within_batch_rejected() {
        let mut session = analyzing();
        assert!(session.record_results([result("a"), result("a")]).is_err());
        assert!(session.agent_results().is_empty());
    }

    #[test]
    fn test_recommendation_set_once() {
        let mut session = analyzing();
        let rec = Synthesizer::default().synthesize(&[]);
        session.set_recommendation(rec.clone()).unwrap();
        assert!(session.set_recommendation(rec).is_err());
    }

    #[test]
    fn test_decide_while_analyzing_is_invalid() {
        let mut session = analyzing();
        let err = session.decide(true).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(session.state(), SessionState::Analyzing);
    }

    #[test]
    fn test_decide_is_idempotent() {
        let mut session = awaiting();
        assert_eq!(session.decide(true).unwrap(), DecisionEffect::Execute);
        assert_eq!(session.state(), SessionState::Executing);
        assert_eq!(session.decide(true).unwrap(), DecisionEffect::Unchanged);
        assert!(session.decide(false).is_err());
    }

    #[test]
    fn test_reject_is_terminal() {
        let mut session = awaiting();
        assert_eq!(session.decide(false).unwrap(), DecisionEffect::Rejected);
        assert!(session.is_terminal());
        assert!(session.completed_at().is_some());
        assert_eq!(session.decide(false).unwrap(), DecisionEffect::Unchanged);
        assert!(session.decide(true).is_err());
    }

    #[test]
    fn test_failed_execution_records_error() {
        let mut session = awaiting();
        session.decide(true).unwrap();
        session
            .record_execution(ExecutionOutcome::failed(Utc::now(), "webhook returned 500"))
            .unwrap();
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.failure(), Some("webhook returned 500"));
        assert!(session.execution_outcome().is_some());
    }

    #[test]
    fn test_fail_only_before_decision() {
        let mut session = analyzing();
        session.fail("abandoned").unwrap();
        assert_eq!(session.failure(), Some("abandoned"));
        assert!(awaiting().fail("late").is_err());
    }
}
