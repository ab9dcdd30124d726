//! Application-level configuration.
//!
//! - [`OrchestratorParams`] — timeouts, concurrency bound and approval flow

pub mod orchestrator_params;

pub use orchestrator_params::{ApprovalMode, OrchestratorParams};
