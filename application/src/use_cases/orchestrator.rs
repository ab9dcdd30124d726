//! Analysis orchestrator
//!
//! Owns the session lifecycle: runs the roster phase by phase, synthesizes a
//! recommendation, waits for (or skips) human approval, and dispatches the
//! approved recommendation to the executor exactly once.
//!
//! ```text
//! CREATED -> ANALYZING -> AWAITING_APPROVAL -> APPROVED -> EXECUTING -> COMPLETED
//!                |               |                             |
//!                v               v                             v
//!              FAILED         REJECTED                       FAILED
//! ```

use crate::config::{ApprovalMode, OrchestratorParams};
use crate::ports::executor::ExecutionPort;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::reasoning_client::ReasoningClient;
use crate::ports::transparency::{NoTransparency, TransparencyEvent, TransparencySink};
use crate::use_cases::agent_runner::AgentRunner;
use crate::use_cases::phase_scheduler::PhaseScheduler;
use advisor_domain::{
    AnalysisContext, AnalysisInput, DecisionEffect, DomainError, ExecutionOutcome,
    Recommendation, Roster, Session, SessionId, SessionRepository, SessionState, StoreError,
    Synthesizer,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Failure reason recorded on sessions stopped by [`AnalysisOrchestrator::abandon`].
pub const ABANDONED: &str = "abandoned";

/// Errors surfaced to callers of the orchestrator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("{0}")]
    InvalidState(DomainError),

    #[error("Execution failed for session {session}: {message}")]
    ExecutionFailed { session: SessionId, message: String },
}

impl From<StoreError> for OrchestratorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OrchestratorError::NotFound(id),
            StoreError::Rejected(e) => OrchestratorError::InvalidState(e),
        }
    }
}

/// Why a session's analysis stopped early.
enum Interrupt {
    Cancelled,
    TimedOut(Duration),
    Store(StoreError),
}

impl Interrupt {
    fn reason(&self) -> String {
        match self {
            Interrupt::Cancelled => ABANDONED.to_string(),
            Interrupt::TimedOut(limit) => format!("analysis exceeded session timeout of {:?}", limit),
            Interrupt::Store(e) => format!("session update rejected: {}", e),
        }
    }
}

impl From<StoreError> for Interrupt {
    fn from(e: StoreError) -> Self {
        Interrupt::Store(e)
    }
}

/// Runs analysis sessions over a fixed roster.
///
/// Cheap to clone; clones share the store, the executor and the reasoning
/// concurrency limit.
pub struct AnalysisOrchestrator<C: ReasoningClient + 'static> {
    client: Arc<C>,
    roster: Arc<Roster>,
    synthesizer: Synthesizer,
    store: Arc<dyn SessionRepository>,
    executor: Arc<dyn ExecutionPort>,
    transparency: Arc<dyn TransparencySink>,
    progress: Arc<dyn ProgressNotifier>,
    limiter: Arc<Semaphore>,
    params: OrchestratorParams,
    cancellations: Arc<Mutex<HashMap<SessionId, CancellationToken>>>,
}

impl<C: ReasoningClient + 'static> Clone for AnalysisOrchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            roster: Arc::clone(&self.roster),
            synthesizer: self.synthesizer.clone(),
            store: Arc::clone(&self.store),
            executor: Arc::clone(&self.executor),
            transparency: Arc::clone(&self.transparency),
            progress: Arc::clone(&self.progress),
            limiter: Arc::clone(&self.limiter),
            params: self.params.clone(),
            cancellations: Arc::clone(&self.cancellations),
        }
    }
}

impl<C: ReasoningClient + 'static> AnalysisOrchestrator<C> {
    pub fn new(
        client: Arc<C>,
        roster: Roster,
        store: Arc<dyn SessionRepository>,
        executor: Arc<dyn ExecutionPort>,
    ) -> Self {
        let params = OrchestratorParams::default();
        Self {
            client,
            roster: Arc::new(roster),
            synthesizer: Synthesizer::default(),
            store,
            executor,
            transparency: Arc::new(NoTransparency),
            progress: Arc::new(NoProgress),
            limiter: Arc::new(Semaphore::new(params.max_in_flight)),
            params,
            cancellations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // ==================== Builder Methods ====================

    /// Replace the parameters. Also resizes the in-flight limit, so call
    /// [`Self::with_limiter`] afterwards when sharing one.
    pub fn with_params(mut self, params: OrchestratorParams) -> Self {
        self.limiter = Arc::new(Semaphore::new(params.max_in_flight));
        self.params = params;
        self
    }

    /// Share an in-flight limit with other orchestrators.
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_transparency(mut self, sink: Arc<dyn TransparencySink>) -> Self {
        self.transparency = sink;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn params(&self) -> &OrchestratorParams {
        &self.params
    }

    // ==================== Operations ====================

    /// Create a session and analyze it in the background.
    ///
    /// Returns as soon as the session is stored; poll [`Self::get_session`]
    /// for progress. Must be called from within a Tokio runtime.
    pub fn start_analysis(&self, input: AnalysisInput) -> SessionId {
        let (id, cancel) = self.register(input);
        let this = self.clone();
        tokio::spawn(async move { this.run_session(id, cancel).await });
        id
    }

    /// Create a session and analyze it to the end before returning.
    ///
    /// The returned snapshot is `AWAITING_APPROVAL`, or terminal when the
    /// analysis failed or auto-approval ran the executor.
    pub async fn analyze(&self, input: AnalysisInput) -> Result<Session, OrchestratorError> {
        let (id, cancel) = self.register(input);
        self.run_session(id, cancel).await;
        self.get_session(&id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Session, OrchestratorError> {
        self.store.get(id).ok_or(OrchestratorError::NotFound(*id))
    }

    /// Apply a human decision.
    ///
    /// Approval runs the executor and returns once the outcome is recorded.
    /// Execution continues to completion even if this future is dropped.
    /// Repeating a decision already applied returns the current snapshot
    /// without running anything.
    pub async fn decide(&self, id: &SessionId, approved: bool) -> Result<Session, OrchestratorError> {
        let mut effect = DecisionEffect::Unchanged;
        let snapshot = self.store.update(id, &mut |session| {
            effect = session.decide(approved)?;
            Ok(())
        })?;

        match effect {
            DecisionEffect::Execute => {
                info!(session = %id, "Recommendation approved");
                self.execute_detached(snapshot).await
            }
            DecisionEffect::Rejected => {
                info!(session = %id, "Recommendation rejected");
                self.progress.on_state_change(*id, snapshot.state());
                Ok(snapshot)
            }
            DecisionEffect::Unchanged => {
                debug!(session = %id, "Repeated decision ignored");
                Ok(snapshot)
            }
        }
    }

    /// Stop a session that is still being analyzed.
    ///
    /// The session fails immediately; in-flight reasoning calls are cancelled
    /// and their results discarded.
    pub fn abandon(&self, id: &SessionId) -> Result<Session, OrchestratorError> {
        let snapshot = self.store.update(id, &mut |session| {
            if !session.state().is_analyzing() {
                return Err(DomainError::InvalidState {
                    session: session.id().to_string(),
                    state: session.state(),
                    operation: "abandon",
                });
            }
            session.fail(ABANDONED)
        })?;

        if let Some(cancel) = self.cancellations().remove(id) {
            cancel.cancel();
        }
        info!(session = %id, "Session abandoned");
        self.progress.on_state_change(*id, snapshot.state());
        Ok(snapshot)
    }

    // ==================== Pipeline ====================

    fn register(&self, input: AnalysisInput) -> (SessionId, CancellationToken) {
        let session = Session::new(self.roster.name(), input);
        let id = session.id();
        let cancel = CancellationToken::new();
        self.store.put(session);
        self.cancellations().insert(id, cancel.clone());
        info!(session = %id, roster = self.roster.name(), "Session created");
        (id, cancel)
    }

    fn cancellations(&self) -> MutexGuard<'_, HashMap<SessionId, CancellationToken>> {
        self.cancellations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_session(&self, id: SessionId, cancel: CancellationToken) {
        let analysis = self.run_phases(id, &cancel);
        let outcome = match self.params.session_timeout {
            Some(limit) => tokio::time::timeout(limit, analysis)
                .await
                .unwrap_or(Err(Interrupt::TimedOut(limit))),
            None => analysis.await,
        };
        self.cancellations().remove(&id);

        match outcome {
            Ok(Some(session)) => {
                if let Err(e) = self.execute_detached(session).await {
                    warn!(session = %id, "Auto-approved execution failed: {}", e);
                }
            }
            Ok(None) => {}
            Err(interrupt) => self.interrupt(id, interrupt),
        }
    }

    /// Analyze every phase and store the recommendation.
    ///
    /// Returns the session when it was auto-approved and must be executed.
    async fn run_phases(
        &self,
        id: SessionId,
        cancel: &CancellationToken,
    ) -> Result<Option<Session>, Interrupt> {
        let session = self.store.update(&id, &mut |s| s.transition(SessionState::Analyzing))?;
        self.progress.on_state_change(id, session.state());

        let runner = AgentRunner::new(
            Arc::clone(&self.client),
            Arc::clone(&self.limiter),
            self.params.clone(),
        );
        let scheduler = PhaseScheduler::new(runner, self.params.clone());
        let mut context = AnalysisContext::new(session.input().clone());

        for (phase, agents) in self.roster.phases().iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(Interrupt::Cancelled);
            }
            info!(session = %id, phase, agents = agents.len(), "Phase started");
            self.progress.on_phase_start(phase, agents);

            let snapshot = Arc::new(context.clone());
            let results = scheduler
                .run_phase(phase, agents, snapshot, cancel, self.progress.as_ref())
                .await
                .map_err(|_| Interrupt::Cancelled)?;

            for result in &results {
                self.transparency
                    .publish(TransparencyEvent::agent_result(id, result));
            }
            self.store
                .update(&id, &mut |s| s.record_results(results.iter().cloned()))?;
            context.extend(results);
            self.progress.on_phase_complete(phase);
        }

        let recommendation = self.synthesizer.synthesize(context.prior_results());
        info!(session = %id, "Recommendation: {}", recommendation.headline());
        self.progress.on_recommendation(id, &recommendation);
        self.publish_recommendation(id, &recommendation);

        let auto = self.params.approval_mode == ApprovalMode::Auto && !recommendation.requires_approval;
        let session = self.store.update(&id, &mut |s| {
            s.set_recommendation(recommendation.clone())?;
            if auto {
                s.auto_approve()
            } else {
                s.transition(SessionState::AwaitingApproval)
            }
        })?;
        self.progress.on_state_change(id, session.state());

        if auto {
            info!(session = %id, "Recommendation auto-approved");
        }
        Ok(auto.then_some(session))
    }

    /// Run [`Self::execute`] on its own task so the outcome is recorded
    /// even when the caller stops waiting.
    async fn execute_detached(&self, session: Session) -> Result<Session, OrchestratorError> {
        let id = session.id();
        let this = self.clone();
        tokio::spawn(async move { this.execute(session).await })
            .await
            .unwrap_or_else(|e| {
                Err(OrchestratorError::ExecutionFailed {
                    session: id,
                    message: format!("execution task failed: {}", e),
                })
            })
    }

    /// Run the executor for a session in `EXECUTING` and record the outcome.
    async fn execute(&self, session: Session) -> Result<Session, OrchestratorError> {
        let id = session.id();
        let started = Utc::now();

        let outcome = match session.recommendation().cloned() {
            Some(recommendation) => {
                info!(session = %id, "Executing {}", recommendation.headline());
                self.call_executor(id, recommendation, started).await
            }
            None => ExecutionOutcome::failed(started, "session has no recommendation"),
        };

        let error = outcome.error.clone();
        let snapshot = self
            .store
            .update(&id, &mut |s| s.record_execution(outcome.clone()))?;
        self.progress.on_state_change(id, snapshot.state());

        match error {
            Some(message) => Err(OrchestratorError::ExecutionFailed { session: id, message }),
            None => Ok(snapshot),
        }
    }

    /// One executor call bounded by the execution timeout. A panic or a
    /// timeout becomes a failed outcome.
    async fn call_executor(
        &self,
        id: SessionId,
        recommendation: Recommendation,
        started: DateTime<Utc>,
    ) -> ExecutionOutcome {
        let executor = Arc::clone(&self.executor);
        let limit = self.params.execution_timeout;
        let mut call = tokio::spawn(async move { executor.execute(id, &recommendation).await });

        let message = match tokio::time::timeout(limit, &mut call).await {
            Ok(Ok(Ok(artifact))) => return ExecutionOutcome::succeeded(started, artifact.into_value()),
            Ok(Ok(Err(e))) => e.to_string(),
            Ok(Err(e)) => format!("execution task failed: {}", e),
            Err(_) => {
                call.abort();
                format!("no execution result within {:?}", limit)
            }
        };
        warn!(session = %id, "Execution failed: {}", message);
        ExecutionOutcome::failed(started, message)
    }

    fn interrupt(&self, id: SessionId, interrupt: Interrupt) {
        let reason = interrupt.reason();
        let failed = self.store.update(&id, &mut |s| {
            if s.state().is_analyzing() {
                s.fail(reason.clone())?;
            }
            Ok(())
        });
        match failed {
            Ok(session) if session.state() == SessionState::Failed => {
                warn!(session = %id, "Analysis stopped: {}", session.failure().unwrap_or(&reason));
                self.progress.on_state_change(id, session.state());
            }
            Ok(_) => {}
            Err(e) => warn!(session = %id, "Could not record interruption: {}", e),
        }
    }

    fn publish_recommendation(&self, id: SessionId, recommendation: &Recommendation) {
        match serde_json::to_value(recommendation) {
            Ok(payload) => self
                .transparency
                .publish(TransparencyEvent::new("recommendation", id, payload)),
            Err(e) => warn!(session = %id, "Could not serialize recommendation: {}", e),
        }
    }
}
