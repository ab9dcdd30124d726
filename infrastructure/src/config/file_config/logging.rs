//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file; stderr when unset.
    pub file: Option<String>,
    /// JSONL file receiving every agent exchange; disabled when unset.
    pub transparency_log: Option<String>,
}
