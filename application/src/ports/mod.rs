//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod executor;
pub mod progress;
pub mod reasoning_client;
pub mod transparency;
