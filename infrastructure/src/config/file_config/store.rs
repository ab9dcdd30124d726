//! Session store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// How long terminal sessions are kept, in seconds.
    pub ttl_seconds: u64,
    /// How often expired sessions are swept, in seconds.
    pub sweep_interval_seconds: u64,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            sweep_interval_seconds: 60,
        }
    }
}
