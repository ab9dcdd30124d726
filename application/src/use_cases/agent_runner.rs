//! Agent runner
//!
//! Runs one agent: builds its prompt, makes a single reasoning call through the
//! global in-flight limiter, validates the payload, and falls back to the
//! role's deterministic default on any failure. It never fails itself.

use crate::config::OrchestratorParams;
use crate::ports::reasoning_client::{
    ReasoningClient, ReasoningError, ReasoningRequest, ReasoningResponse,
};
use advisor_domain::{
    AgentPayload, AgentResult, AgentSpec, AnalysisContext, PromptTemplate, fallback_payload,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, warn};

pub struct AgentRunner<C: ReasoningClient + 'static> {
    client: Arc<C>,
    limiter: Arc<Semaphore>,
    params: OrchestratorParams,
}

impl<C: ReasoningClient + 'static> AgentRunner<C> {
    pub fn new(client: Arc<C>, limiter: Arc<Semaphore>, params: OrchestratorParams) -> Self {
        Self {
            client,
            limiter,
            params,
        }
    }

    /// Build the request `spec` sends for `context`.
    pub fn request_for(&self, spec: &AgentSpec, context: &AnalysisContext) -> ReasoningRequest {
        ReasoningRequest {
            role: spec.role,
            system_prompt: PromptTemplate::system(spec.role).to_string(),
            prompt: PromptTemplate::agent_prompt(spec.role, context),
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            required_fields: spec.role.required_fields(),
        }
    }

    /// Run `spec` against `context`, which must only hold earlier-phase results.
    pub async fn run(&self, spec: &AgentSpec, phase: usize, context: &AnalysisContext) -> AgentResult {
        let started = Instant::now();
        let request = self.request_for(spec, context);
        debug!(agent = %spec.name, phase, "Sending reasoning request");

        let result = match self.call(&request).await {
            Ok(response) => match AgentPayload::from_response(spec.role, &response.payload) {
                Ok(payload) => AgentResult::ok(spec, phase, payload),
                Err(e) => {
                    warn!(agent = %spec.name, "Payload rejected, falling back: {}", e);
                    AgentResult::fallback(spec, phase, fallback_payload(spec.role, context), e.to_string())
                }
            }
            .with_exchange(Some(request.prompt), Some(response.raw)),
            Err(e) => {
                warn!(agent = %spec.name, "Reasoning call failed, falling back: {}", e);
                AgentResult::fallback(spec, phase, fallback_payload(spec.role, context), e.to_string())
                    .with_exchange(Some(request.prompt), None)
            }
        };

        result.with_duration_ms(started.elapsed().as_millis() as u64)
    }

    /// One bounded, timed attempt. Waiting for a permit is not part of the timeout.
    async fn call(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ReasoningError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| ReasoningError::unavailable("reasoning limiter closed"))?;

        let timeout = self.params.reasoning_timeout;
        match tokio::time::timeout(timeout, self.client.invoke(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ReasoningError::unavailable(format!(
                "no response within {:?}",
                timeout
            ))),
        }
    }
}
