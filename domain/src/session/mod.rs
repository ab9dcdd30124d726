//! Session domain
//!
//! A session is one end-to-end analysis: input, per-agent results, the
//! synthesized recommendation, and the outcome of the approval gate.

pub mod entities;
pub mod execution;
pub mod repository;
pub mod state;
