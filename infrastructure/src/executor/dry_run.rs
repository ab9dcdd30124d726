//! Dry-run executor

use advisor_application::{ExecutionArtifact, ExecutionError, ExecutionPort};
use advisor_domain::{Recommendation, SessionId};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Describes the approved action as a JSON plan without performing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl ExecutionPort for DryRunExecutor {
    async fn execute(
        &self,
        session_id: SessionId,
        recommendation: &Recommendation,
    ) -> Result<ExecutionArtifact, ExecutionError> {
        let action = recommendation.primary_choice.as_deref().ok_or_else(|| {
            ExecutionError::NothingToExecute("recommendation states no choice".to_string())
        })?;

        let steps: Vec<String> = recommendation
            .supporting_factors
            .iter()
            .map(|f| format!("{}: {}", f.agent_name, f.excerpt))
            .collect();

        info!(session = %session_id, action, "Dry run, nothing executed");
        Ok(ExecutionArtifact(json!({
            "mode": "dry_run",
            "session_id": session_id.to_string(),
            "action": action,
            "chosen_by": recommendation.chosen_by,
            "aggregate_confidence": recommendation.aggregate_confidence,
            "risk_flags": recommendation.risk_flags,
            "steps": steps,
            "generated_at": chrono::Utc::now().to_rfc3339(),
        })))
    }
}
