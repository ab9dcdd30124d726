//! Domain layer for advisor
//!
//! This crate contains the core business logic, entities, and value objects
//! of the multi-agent analysis engine. It performs no I/O.
//!
//! # Core Concepts
//!
//! - **Agent**: a named role that turns the session context into a structured
//!   opinion via one remote reasoning call, with a deterministic fallback.
//! - **Phase**: a barrier grouping agents that run concurrently; later phases
//!   see every result of earlier ones.
//! - **Synthesizer**: pure function merging all results into one
//!   [`Recommendation`] with a weighted aggregate confidence.
//! - **Approval gate**: the human checkpoint between recommendation and any
//!   real-world side effect, modelled by the [`SessionState`] machine.

pub mod agent;
pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod synthesis;
pub mod util;

// Re-export commonly used types
pub use agent::{
    fallback::{FALLBACK_CONFIDENCE, fallback_payload},
    payload::{
        AgentPayload, ArchitectureDecision, CostEstimate, DataModelAssessment, LogFindings,
        MetricFindings, RemediationPlan, RoleDetails, RootCauseHypothesis, ScalabilityReview,
        SecurityReview, WorkloadAssessment,
    },
    result::{AgentResult, AgentStatus},
    role::AgentRole,
};
pub use config::OutputFormat;
pub use core::{error::DomainError, input::AnalysisInput};
pub use orchestration::{
    context::AnalysisContext,
    roster::{AgentSpec, Roster, RosterKind},
};
pub use prompt::{PromptTemplate, extract_json_object, missing_fields};
pub use session::{
    entities::{DecisionEffect, Session, SessionId},
    execution::ExecutionOutcome,
    repository::{SessionRepository, StoreError},
    state::SessionState,
};
pub use synthesis::{
    recommendation::{Recommendation, SupportingFactor},
    synthesizer::{CONFIDENCE_FLOOR, RISK_THRESHOLD, SynthesisPolicy, Synthesizer, aggregate_confidence},
};
