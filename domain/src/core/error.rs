//! Domain error types

use crate::session::state::SessionState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session {session}: cannot move from {from} to {to}")]
    InvalidTransition {
        session: String,
        from: SessionState,
        to: SessionState,
    },

    #[error("Session {session}: cannot {operation} while {state}")]
    InvalidState {
        session: String,
        state: SessionState,
        operation: &'static str,
    },

    #[error("Session {session} already holds a result for agent '{agent}'")]
    DuplicateResult { session: String, agent: String },

    #[error("Session {0} already has a recommendation")]
    RecommendationAlreadySet(String),

    #[error("Payload validation failed: {0}")]
    ValidationFailed(String),
}

impl DomainError {
    /// Check if this error was raised by an operation against the wrong session state
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidState { .. } | DomainError::InvalidTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let error = DomainError::InvalidState {
            session: "abc".to_string(),
            state: SessionState::Analyzing,
            operation: "decide",
        };
        assert_eq!(error.to_string(), "Session abc: cannot decide while ANALYZING");
    }

    #[test]
    fn test_is_invalid_state_check() {
        assert!(
            DomainError::InvalidTransition {
                session: "abc".to_string(),
                from: SessionState::Completed,
                to: SessionState::Analyzing,
            }
            .is_invalid_state()
        );
        assert!(!DomainError::ValidationFailed("x".to_string()).is_invalid_state());
        assert!(!DomainError::InvalidRoster("x".to_string()).is_invalid_state());
    }
}
