//! HTTP reasoning client
//!
//! Speaks a Messages-style API: one `POST` per call carrying `model`,
//! `max_tokens`, `temperature`, `system` and a single user message. The first
//! text content block of the reply is the response text.

use crate::config::FileReasoningConfig;
use advisor_application::{ReasoningClient, ReasoningError, ReasoningRequest, ReasoningResponse};
use advisor_domain::util::truncate_str;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Bytes of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for [`HttpReasoningClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReasoningConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_version: String,
    /// Hard timeout of one call, connection included.
    pub timeout: Duration,
}

impl From<&FileReasoningConfig> for HttpReasoningConfig {
    fn from(config: &FileReasoningConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct HttpReasoningClient {
    http: reqwest::Client,
    config: HttpReasoningConfig,
}

impl HttpReasoningClient {
    pub fn new(config: HttpReasoningConfig) -> Result<Self, ReasoningError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReasoningError::unavailable(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HttpReasoningConfig {
        &self.config
    }

    fn first_text(body: &str) -> Result<String, ReasoningError> {
        let response: MessagesResponse = serde_json::from_str(body)
            .map_err(|e| ReasoningError::malformed(format!("unreadable reply envelope: {}", e)))?;
        response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ReasoningError::malformed("reply has no text content block"))
    }
}

#[async_trait]
impl ReasoningClient for HttpReasoningClient {
    async fn invoke(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ReasoningError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system_prompt,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let mut call = self
            .http
            .post(&self.config.endpoint)
            .header("anthropic-version", &self.config.api_version)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            call = call.header("x-api-key", key);
        }

        debug!(role = %request.role, endpoint = %self.config.endpoint, "POST reasoning request");
        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                ReasoningError::unavailable(format!("timed out after {:?}", self.config.timeout))
            } else {
                ReasoningError::unavailable(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReasoningError::unavailable(format!("reading reply failed: {}", e)))?;

        if !status.is_success() {
            return Err(ReasoningError::unavailable(format!(
                "endpoint returned {}: {}",
                status,
                truncate_str(&text, MAX_ERROR_BODY)
            )));
        }

        let reply = Self::first_text(&text)?;
        ReasoningResponse::parse(reply, request.required_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_application::ReasoningErrorKind;
    use advisor_domain::AgentRole;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, timeout: Duration) -> HttpReasoningClient {
        HttpReasoningClient::new(HttpReasoningConfig {
            endpoint: format!("{}/v1/messages", server.uri()),
            model: "test-model".to_string(),
            api_key: Some("secret".to_string()),
            api_version: "2023-06-01".to_string(),
            timeout,
        })
        .unwrap()
    }

    fn request() -> ReasoningRequest {
        ReasoningRequest {
            role: AgentRole::RootCause,
            system_prompt: "You are the root cause analyst.".to_string(),
            prompt: "Logs: OOM killed".to_string(),
            max_tokens: 256,
            temperature: 0.1,
            required_fields: AgentRole::RootCause.required_fields(),
        }
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn"
        })
    }

    #[tokio::test]
    async fn test_successful_reply_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "secret"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 256,
                "system": "You are the root cause analyst.",
                "messages": [{"role": "user", "content": "Logs: OOM killed"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(
                "```json\n{\"confidence\": 0.8, \"summary\": \"memory\", \"probable_cause\": \"memory exhaustion\"}\n```",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server, Duration::from_secs(5))
            .invoke(&request())
            .await
            .unwrap();
        assert_eq!(response.payload["probable_cause"], "memory exhaustion");
        assert!(response.raw.starts_with("```json"));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("Overloaded"))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .invoke(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Unavailable);
        assert!(err.message.contains("529"));
        assert!(err.message.contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_prose_reply_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("I think it was the disk.")))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .invoke(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Malformed);
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply(r#"{"confidence": 0.8, "summary": "memory"}"#)),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .invoke(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Malformed);
        assert!(err.message.contains("probable_cause"));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out_as_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply("{}"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_millis(100))
            .invoke(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let client = HttpReasoningClient::new(HttpReasoningConfig {
            endpoint: "http://127.0.0.1:9/v1/messages".to_string(),
            model: "test-model".to_string(),
            api_key: None,
            api_version: "2023-06-01".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let err = client.invoke(&request()).await.unwrap_err();
        assert_eq!(err.kind, ReasoningErrorKind::Unavailable);
    }
}
