//! Reasoning service configuration from TOML (`[reasoning]` section)

use serde::{Deserialize, Serialize};

/// Remote reasoning endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Messages endpoint URL.
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Environment variable holding the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// API version header.
    pub api_version: String,
    /// Hard timeout of one call, in seconds.
    pub timeout_seconds: u64,
    /// Maximum output tokens per call.
    pub max_tokens: u32,
    /// Sampling temperature, `[0, 1]`.
    pub temperature: f32,
    /// Never call the endpoint; every agent uses its fallback.
    pub offline: bool,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-sonnet-latest".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            api_version: "2023-06-01".to_string(),
            timeout_seconds: 30,
            max_tokens: 1024,
            temperature: 0.2,
            offline: false,
        }
    }
}

impl FileReasoningConfig {
    /// API key from the config file, else from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
