//! Scripted doubles shared by the use case tests.

use crate::ports::executor::{ExecutionArtifact, ExecutionError, ExecutionPort};
use crate::ports::reasoning_client::{
    ReasoningClient, ReasoningError, ReasoningErrorKind, ReasoningRequest, ReasoningResponse,
};
use crate::ports::transparency::{TransparencyEvent, TransparencySink};
use advisor_domain::{
    AgentRole, AnalysisContext, DomainError, Recommendation, Session, SessionId,
    SessionRepository, StoreError, fallback_payload,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Outcome {
    Reply(String),
    Fail(ReasoningErrorKind),
    /// Never answers
    Hang,
    /// Panics inside the call
    Panic,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub delay: Option<Duration>,
    pub outcome: Outcome,
}

impl Script {
    pub fn now(outcome: Outcome) -> Self {
        Self {
            delay: None,
            outcome,
        }
    }

    pub fn after(delay: Duration, outcome: Outcome) -> Self {
        Self {
            delay: Some(delay),
            outcome,
        }
    }
}

/// A valid reply for `role` whose summary is `marker-<role>`.
pub fn valid_reply(role: AgentRole, confidence: f64) -> String {
    let mut payload = fallback_payload(role, &AnalysisContext::default());
    payload.confidence = confidence;
    payload.summary = format!("marker-{}", role.as_str());
    serde_json::to_string(&payload).unwrap()
}

/// Reasoning client answering per role, recording every prompt it sees.
pub struct ScriptedClient {
    scripts: HashMap<AgentRole, Script>,
    default_confidence: f64,
    prompts: Mutex<Vec<(AgentRole, String)>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    abandoned: Arc<AtomicUsize>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_confidence: 0.9,
            prompts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            abandoned: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn script(mut self, role: AgentRole, script: Script) -> Self {
        self.scripts.insert(role, script);
        self
    }

    /// Same script for every role.
    pub fn script_all(mut self, script: Script) -> Self {
        for role in AgentRole::ALL {
            self.scripts.insert(role, script.clone());
        }
        self
    }

    pub fn prompts_for(&self, role: AgentRole) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Highest number of concurrent invocations observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Hanging invocations that were dropped before answering.
    pub fn abandoned_calls(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReasoningClient for ScriptedClient {
    async fn invoke(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ReasoningError> {
        self.prompts
            .lock()
            .unwrap()
            .push((request.role, request.prompt.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let script = self.scripts.get(&request.role).cloned().unwrap_or_else(|| {
            Script::now(Outcome::Reply(valid_reply(request.role, self.default_confidence)))
        });
        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        match script.outcome {
            Outcome::Reply(raw) => ReasoningResponse::parse(raw, request.required_fields),
            Outcome::Fail(ReasoningErrorKind::Unavailable) => {
                Err(ReasoningError::unavailable("scripted outage"))
            }
            Outcome::Fail(ReasoningErrorKind::Malformed) => {
                Err(ReasoningError::malformed("scripted garbage"))
            }
            Outcome::Hang => {
                let _counter = DropCounter(self.abandoned.clone());
                std::future::pending::<()>().await;
                Err(ReasoningError::unavailable("unreachable"))
            }
            Outcome::Panic => panic!("scripted panic for {}", request.role),
        }
    }
}

/// Minimal session store with the same commit-on-success semantics as the real one.
#[derive(Default)]
pub struct TestStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl TestStore {
    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().values().cloned().collect()
    }
}

impl SessionRepository for TestStore {
    fn put(&self, session: Session) {
        self.sessions.lock().unwrap().insert(session.id(), session);
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    fn delete(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().unwrap().remove(id)
    }

    fn update(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut Session) -> Result<(), DomainError>,
    ) -> Result<Session, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let stored = sessions.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

/// Executor counting its invocations.
pub struct CountingExecutor {
    calls: AtomicUsize,
    fail: bool,
    delay: Duration,
}

impl CountingExecutor {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            delay: Duration::from_millis(20),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionPort for CountingExecutor {
    async fn execute(
        &self,
        session_id: SessionId,
        recommendation: &Recommendation,
    ) -> Result<ExecutionArtifact, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(ExecutionError::Failed("target refused the plan".to_string()));
        }
        Ok(ExecutionArtifact(json!({
            "session": session_id.to_string(),
            "choice": recommendation.primary_choice,
        })))
    }
}

/// Sink remembering the event types it received.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(&'static str, SessionId)>>,
}

impl RecordingSink {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl TransparencySink for RecordingSink {
    fn publish(&self, event: TransparencyEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.session_id));
    }
}
