//! Infrastructure layer for advisor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod executor;
pub mod logging;
pub mod reasoning;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, ExecutorKind, FileConfig, FileExecutorConfig,
    FileLoggingConfig, FileOrchestratorConfig, FileOutputConfig, FileOutputFormat,
    FileReasoningConfig, FileStoreConfig,
};
pub use executor::{DryRunExecutor, WebhookExecutor, executor_from_config};
pub use logging::JsonlTransparencySink;
pub use reasoning::{HttpReasoningClient, HttpReasoningConfig, OfflineReasoningClient};
pub use store::InMemorySessionStore;
