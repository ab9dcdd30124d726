//! Synthesis of agent results into a single recommendation

pub mod recommendation;
pub mod synthesizer;
