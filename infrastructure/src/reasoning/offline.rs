//! Offline reasoning client

use advisor_application::{ReasoningClient, ReasoningError, ReasoningRequest, ReasoningResponse};
use async_trait::async_trait;

/// Client for runs without network access.
///
/// Every call reports the service as unavailable, so each agent answers with
/// its deterministic fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineReasoningClient;

#[async_trait]
impl ReasoningClient for OfflineReasoningClient {
    async fn invoke(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ReasoningError> {
        Err(ReasoningError::unavailable(format!(
            "offline mode: {} not sent",
            request.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_application::ReasoningErrorKind;
    use advisor_domain::AgentRole;

    #[tokio::test]
    async fn test_offline_is_always_unavailable() {
        let request = ReasoningRequest {
            role: AgentRole::Metrics,
            system_prompt: String::new(),
            prompt: "anything".to_string(),
            max_tokens: 10,
            temperature: 0.0,
            required_fields: AgentRole::Metrics.required_fields(),
        };
        let err = OfflineReasoningClient.invoke(&request).await.unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Unavailable);
    }
}
