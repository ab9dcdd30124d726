//! Phase scheduler
//!
//! Runs every agent of one phase concurrently against the same context
//! snapshot and waits for all of them (or the phase deadline) before
//! returning. Phases never overlap: the caller only starts phase N+1 after
//! [`PhaseScheduler::run_phase`] for phase N has returned.

use crate::config::OrchestratorParams;
use crate::ports::progress::ProgressNotifier;
use crate::ports::reasoning_client::ReasoningClient;
use crate::use_cases::agent_runner::AgentRunner;
use advisor_domain::{AgentResult, AgentSpec, AnalysisContext};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{Id, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reason recorded for agents still running at the barrier.
pub const MISSED_BARRIER: &str = "missed phase barrier";

/// Reason recorded for agents whose task panicked.
pub const TASK_FAILED: &str = "agent task failed";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("phase {0} cancelled")]
    Cancelled(usize),
}

pub struct PhaseScheduler<C: ReasoningClient + 'static> {
    runner: Arc<AgentRunner<C>>,
    params: OrchestratorParams,
}

impl<C: ReasoningClient + 'static> PhaseScheduler<C> {
    pub fn new(runner: AgentRunner<C>, params: OrchestratorParams) -> Self {
        Self {
            runner: Arc::new(runner),
            params,
        }
    }

    /// Run one phase.
    ///
    /// Returns exactly one result per agent: finished agents in completion
    /// order (a panicked agent becomes `ERROR`), then an `ERROR` result for
    /// each agent that missed the barrier.
    /// Agents still running when the barrier passes, or when `cancel` fires,
    /// are aborted.
    pub async fn run_phase(
        &self,
        phase: usize,
        agents: &[AgentSpec],
        context: Arc<AnalysisContext>,
        cancel: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<AgentResult>, PhaseError> {
        let deadline = Instant::now() + self.params.phase_timeout();
        let mut join_set = JoinSet::new();
        let mut running: HashMap<Id, usize> = HashMap::with_capacity(agents.len());

        for (index, spec) in agents.iter().enumerate() {
            let runner = Arc::clone(&self.runner);
            let context = Arc::clone(&context);
            let spec = spec.clone();
            let handle = join_set.spawn(async move { runner.run(&spec, phase, &context).await });
            running.insert(handle.id(), index);
        }

        let mut results = Vec::with_capacity(agents.len());
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(phase, "Phase cancelled, aborting {} agent(s)", join_set.len());
                    join_set.abort_all();
                    return Err(PhaseError::Cancelled(phase));
                }
                next = tokio::time::timeout_at(deadline, join_set.join_next_with_id()) => match next {
                    Ok(Some(Ok((id, result)))) => {
                        running.remove(&id);
                        debug!(phase, agent = %result.agent_name, status = %result.status, "Agent completed");
                        progress.on_agent_complete(phase, &result);
                        results.push(result);
                    }
                    Ok(Some(Err(e))) => {
                        warn!(phase, "Agent task failed: {}", e);
                        if let Some(index) = running.remove(&e.id()) {
                            let result = AgentResult::error(&agents[index], phase, TASK_FAILED);
                            progress.on_agent_complete(phase, &result);
                            results.push(result);
                        }
                    }
                    Ok(None) => break,
                    Err(_) => {
                        warn!(phase, "Phase barrier reached with {} agent(s) still running", join_set.len());
                        join_set.abort_all();
                        break;
                    }
                },
            }
        }

        let mut missed: Vec<usize> = running.into_values().collect();
        missed.sort_unstable();
        for index in missed {
            let result = AgentResult::error(&agents[index], phase, MISSED_BARRIER);
            progress.on_agent_complete(phase, &result);
            results.push(result);
        }

        Ok(results)
    }
}
