//! Session lifecycle states

use serde::{Deserialize, Serialize};

/// Lifecycle state of an analysis session.
///
/// ```text
/// CREATED -> ANALYZING -> AWAITING_APPROVAL -> APPROVED -> EXECUTING -> COMPLETED
///               |                |                              \---> FAILED
///               |                \-> REJECTED
///               +-> APPROVED (auto-approval flows)
///               \-> FAILED (abandoned / timed out)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Created,
    Analyzing,
    AwaitingApproval,
    Approved,
    Rejected,
    Executing,
    Completed,
    Failed,
}

impl SessionState {
    /// Whether `next` is a legal successor. No state is ever revisited.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Created, Analyzing)
                | (Created, Failed)
                | (Analyzing, AwaitingApproval)
                | (Analyzing, Approved)
                | (Analyzing, Failed)
                | (AwaitingApproval, Approved)
                | (AwaitingApproval, Rejected)
                | (Approved, Executing)
                | (Executing, Completed)
                | (Executing, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Rejected | SessionState::Completed | SessionState::Failed
        )
    }

    /// States in which analysis is still running and may be abandoned.
    pub fn is_analyzing(&self) -> bool {
        matches!(self, SessionState::Created | SessionState::Analyzing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Created => "CREATED",
            SessionState::Analyzing => "ANALYZING",
            SessionState::AwaitingApproval => "AWAITING_APPROVAL",
            SessionState::Approved => "APPROVED",
            SessionState::Rejected => "REJECTED",
            SessionState::Executing => "EXECUTING",
            SessionState::Completed => "COMPLETED",
            SessionState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    const ALL: [SessionState; 8] = [
        Created,
        Analyzing,
        AwaitingApproval,
        Approved,
        Rejected,
        Executing,
        Completed,
        Failed,
    ];

    #[test]
    fn test_terminal_states_have_no_successor() {
        for state in ALL.into_iter().filter(SessionState::is_terminal) {
            for next in ALL {
                assert!(!state.can_transition_to(next), "{state} -> {next}");
            }
        }
    }

    #[test]
    fn test_no_self_loops() {
        for state in ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn test_rejected_only_from_awaiting_approval() {
        for state in ALL {
            assert_eq!(state.can_transition_to(Rejected), state == AwaitingApproval);
        }
    }

    #[test]
    fn test_only_analyzing_states_can_fail_early() {
        for state in ALL {
            assert_eq!(state.is_analyzing(), matches!(state, Created | Analyzing));
            if state.is_analyzing() {
                assert!(state.can_transition_to(Failed));
            }
        }
    }

    #[test]
    fn test_happy_path_is_legal() {
        let path = [Created, Analyzing, AwaitingApproval, Approved, Executing, Completed];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
    }
}
