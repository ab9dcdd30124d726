//! Progress notification port
//!
//! Defines the interface for reporting progress while a session is analyzed.

use advisor_domain::{AgentResult, AgentSpec, Recommendation, SessionId, SessionState};

/// Callback for progress updates during analysis
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: usize, agents: &[AgentSpec]);

    /// Called when an agent's result is collected (completion order)
    fn on_agent_complete(&self, phase: usize, result: &AgentResult);

    /// Called when a phase's barrier is passed
    fn on_phase_complete(&self, phase: usize);

    /// Called once the recommendation is synthesized.
    fn on_recommendation(&self, _session: SessionId, _recommendation: &Recommendation) {}

    /// Called after every session state transition made by the orchestrator.
    fn on_state_change(&self, _session: SessionId, _state: SessionState) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: usize, _agents: &[AgentSpec]) {}
    fn on_agent_complete(&self, _phase: usize, _result: &AgentResult) {}
    fn on_phase_complete(&self, _phase: usize) {}
}
