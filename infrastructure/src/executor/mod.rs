//! Executor adapters
//!
//! - [`DryRunExecutor`]: returns the plan it would run, touches nothing
//! - [`WebhookExecutor`]: hands the recommendation to an external system

mod dry_run;
mod webhook;

pub use dry_run::DryRunExecutor;
pub use webhook::WebhookExecutor;

use crate::config::{ExecutorKind, FileExecutorConfig};
use advisor_application::{ExecutionError, ExecutionPort};
use std::sync::Arc;
use std::time::Duration;

/// Build the executor selected by `[executor]`.
pub fn executor_from_config(
    config: &FileExecutorConfig,
) -> Result<Arc<dyn ExecutionPort>, ExecutionError> {
    match config.kind {
        ExecutorKind::DryRun => Ok(Arc::new(DryRunExecutor)),
        ExecutorKind::Webhook => {
            let url = config.webhook_url.as_deref().ok_or_else(|| {
                ExecutionError::Failed("executor.webhook_url is not set".to_string())
            })?;
            let timeout = Duration::from_secs(config.timeout_seconds);
            Ok(Arc::new(WebhookExecutor::new(url, timeout)?))
        }
    }
}
