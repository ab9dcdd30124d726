//! Configuration file loading for advisor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ADVISOR_*` environment variables (`ADVISOR_REASONING__MODEL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./advisor.toml` or `./.advisor.toml`
//! 4. Global: `~/.config/advisor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, ExecutorKind, FileConfig, FileExecutorConfig, FileLoggingConfig,
    FileOrchestratorConfig, FileOutputConfig, FileOutputFormat, FileReasoningConfig,
    FileStoreConfig,
};
pub use loader::ConfigLoader;
