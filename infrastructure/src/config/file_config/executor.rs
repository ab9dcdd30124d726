//! Executor configuration from TOML (`[executor]` section)

use serde::{Deserialize, Serialize};

/// Which adapter runs approved recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Produce a plan artifact without side effects
    #[default]
    DryRun,
    /// POST the recommendation to `webhook_url`
    Webhook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    pub kind: ExecutorKind,
    /// Required when `kind = "webhook"`.
    pub webhook_url: Option<String>,
    /// Webhook request timeout, in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::DryRun,
            webhook_url: None,
            timeout_seconds: 30,
        }
    }
}
