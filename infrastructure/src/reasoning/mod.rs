//! Reasoning client adapters
//!
//! - [`HttpReasoningClient`]: Messages-style HTTP endpoint
//! - [`OfflineReasoningClient`]: never reachable, forces deterministic fallbacks

mod http;
mod offline;

pub use http::{HttpReasoningClient, HttpReasoningConfig};
pub use offline::OfflineReasoningClient;
