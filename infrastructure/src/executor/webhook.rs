//! Webhook executor

use advisor_application::{ExecutionArtifact, ExecutionError, ExecutionPort};
use advisor_domain::util::truncate_str;
use advisor_domain::{Recommendation, SessionId};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

const MAX_ERROR_BODY: usize = 300;

/// POSTs the approved recommendation to an external URL.
///
/// Any non-2xx status is an execution failure. The call is never retried.
pub struct WebhookExecutor {
    http: reqwest::Client,
    url: String,
}

impl WebhookExecutor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ExecutionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecutionError::Transport(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExecutionPort for WebhookExecutor {
    async fn execute(
        &self,
        session_id: SessionId,
        recommendation: &Recommendation,
    ) -> Result<ExecutionArtifact, ExecutionError> {
        let body = json!({
            "session_id": session_id.to_string(),
            "recommendation": recommendation,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecutionError::Transport(format!("POST {} failed: {}", self.url, e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ExecutionError::Failed(format!(
                "webhook returned {}: {}",
                status,
                truncate_str(&text, MAX_ERROR_BODY)
            )));
        }

        info!(session = %session_id, url = %self.url, status = status.as_u16(), "Webhook accepted recommendation");
        let reply = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        Ok(ExecutionArtifact(json!({
            "mode": "webhook",
            "url": self.url,
            "status": status.as_u16(),
            "response": reply,
        })))
    }
}
