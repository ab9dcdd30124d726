//! Orchestration domain
//!
//! Rosters (which agents run in which phase) and the read-only context that
//! carries earlier-phase findings forward.

pub mod context;
pub mod roster;
