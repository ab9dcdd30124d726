//! Use cases for the application layer

pub mod agent_runner;
pub mod orchestrator;
pub mod phase_scheduler;

#[cfg(test)]
pub(crate) mod test_support;
