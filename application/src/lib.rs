//! Application layer for advisor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ApprovalMode, OrchestratorParams};
pub use ports::{
    executor::{ExecutionArtifact, ExecutionError, ExecutionPort},
    progress::{NoProgress, ProgressNotifier},
    reasoning_client::{
        ReasoningClient, ReasoningError, ReasoningErrorKind, ReasoningRequest, ReasoningResponse,
    },
    transparency::{NoTransparency, TransparencyEvent, TransparencySink},
};
pub use use_cases::agent_runner::AgentRunner;
pub use use_cases::orchestrator::{ABANDONED, AnalysisOrchestrator, OrchestratorError};
pub use use_cases::phase_scheduler::{MISSED_BARRIER, PhaseError, PhaseScheduler, TASK_FAILED};
