//! Port for the transparency feed.
//!
//! Every agent result, including the raw request and response, may be
//! forwarded to an external progress/telemetry feed. This is separate from
//! `tracing`: tracing carries diagnostics, this carries the full exchange.

use advisor_domain::{AgentResult, SessionId};
use serde_json::{Value, json};

/// A single agent exchange published to the feed.
pub struct TransparencyEvent {
    /// Event type identifier (e.g. "agent_result", "recommendation").
    pub event_type: &'static str,
    pub session_id: SessionId,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TransparencyEvent {
    pub fn new(event_type: &'static str, session_id: SessionId, payload: Value) -> Self {
        Self {
            event_type,
            session_id,
            payload,
        }
    }

    pub fn agent_result(session_id: SessionId, result: &AgentResult) -> Self {
        Self::new(
            "agent_result",
            session_id,
            json!({
                "agent": result.agent_name,
                "role": result.role,
                "phase": result.phase,
                "status": result.status,
                "confidence": result.confidence(),
                "failure": result.failure,
                "duration_ms": result.duration_ms,
                "raw_request": result.raw_request,
                "raw_response": result.raw_response,
            }),
        )
    }
}

/// Sink for transparency events.
///
/// `publish` is synchronous and non-fallible: it must return promptly and
/// swallow its own failures so the pipeline never blocks on it.
pub trait TransparencySink: Send + Sync {
    fn publish(&self, event: TransparencyEvent);
}

/// No-op sink for tests and when the feed is disabled.
pub struct NoTransparency;

impl TransparencySink for NoTransparency {
    fn publish(&self, _event: TransparencyEvent) {}
}
