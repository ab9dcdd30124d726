//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod executor;
mod logging;
mod orchestrator;
mod output;
mod reasoning;
mod store;

pub use executor::{ExecutorKind, FileExecutorConfig};
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reasoning::FileReasoningConfig;
pub use store::FileStoreConfig;

use advisor_application::{ApprovalMode, OrchestratorParams};
use advisor_domain::RosterKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    Zero(&'static str),

    #[error("reasoning.temperature must be within [0, 1], got {0}")]
    TemperatureOutOfRange(f32),

    #[error("reasoning.endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("{field}: unknown value '{value}' (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("executor.webhook_url is required when executor.kind = \"webhook\"")]
    MissingWebhookUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote reasoning endpoint
    pub reasoning: FileReasoningConfig,
    /// Roster, approval flow and limits
    pub orchestrator: FileOrchestratorConfig,
    /// Session retention
    pub store: FileStoreConfig,
    /// Post-approval action
    pub executor: FileExecutorConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let zero_checks = [
            ("reasoning.timeout_seconds", self.reasoning.timeout_seconds),
            ("reasoning.max_tokens", u64::from(self.reasoning.max_tokens)),
            ("orchestrator.max_in_flight", self.orchestrator.max_in_flight as u64),
            (
                "orchestrator.session_timeout_seconds",
                self.orchestrator.session_timeout_seconds,
            ),
            (
                "orchestrator.execution_timeout_seconds",
                self.orchestrator.execution_timeout_seconds,
            ),
            ("store.ttl_seconds", self.store.ttl_seconds),
            ("store.sweep_interval_seconds", self.store.sweep_interval_seconds),
            ("executor.timeout_seconds", self.executor.timeout_seconds),
        ];
        issues.extend(
            zero_checks
                .iter()
                .filter(|(_, value)| *value == 0)
                .map(|(field, _)| ConfigValidationError::Zero(field)),
        );

        if !(0.0..=1.0).contains(&self.reasoning.temperature) {
            issues.push(ConfigValidationError::TemperatureOutOfRange(
                self.reasoning.temperature,
            ));
        }

        if !self.reasoning.offline && self.reasoning.endpoint.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyEndpoint);
        }

        if let Err(e) = self.roster_kind() {
            issues.push(e);
        }
        if let Err(e) = self.approval_mode() {
            issues.push(e);
        }

        if self.executor.kind == ExecutorKind::Webhook
            && self
                .executor
                .webhook_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            issues.push(ConfigValidationError::MissingWebhookUrl);
        }

        issues
    }

    pub fn roster_kind(&self) -> Result<RosterKind, ConfigValidationError> {
        self.orchestrator
            .roster
            .parse()
            .map_err(|_| ConfigValidationError::InvalidValue {
                field: "orchestrator.roster",
                value: self.orchestrator.roster.clone(),
                expected: "provisioning, nosql, incident",
            })
    }

    pub fn approval_mode(&self) -> Result<ApprovalMode, ConfigValidationError> {
        self.orchestrator
            .approval_mode
            .parse()
            .map_err(|_| ConfigValidationError::InvalidValue {
                field: "orchestrator.approval_mode",
                value: self.orchestrator.approval_mode.clone(),
                expected: "manual, auto",
            })
    }

    /// Runtime parameters for the orchestrator.
    ///
    /// Unparseable values fall back to their defaults; [`Self::validate`]
    /// reports them.
    pub fn orchestrator_params(&self) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_reasoning_timeout(Duration::from_secs(self.reasoning.timeout_seconds))
            .with_phase_overhead(Duration::from_secs(self.orchestrator.phase_overhead_seconds))
            .with_session_timeout(Some(Duration::from_secs(
                self.orchestrator.session_timeout_seconds,
            )))
            .with_execution_timeout(Duration::from_secs(
                self.orchestrator.execution_timeout_seconds,
            ))
            .with_max_in_flight(self.orchestrator.max_in_flight)
            .with_max_tokens(self.reasoning.max_tokens)
            .with_temperature(self.reasoning.temperature)
            .with_approval_mode(self.approval_mode().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[reasoning]
endpoint = "http://localhost:9000/v1/messages"
model = "local-model"
timeout_seconds = 12
temperature = 0.0

[orchestrator]
roster = "incident"
approval_mode = "auto"
max_in_flight = 3
execution_timeout_seconds = 45

[store]
ttl_seconds = 120

[executor]
kind = "webhook"
webhook_url = "http://localhost:9100/hooks/advisor"

[output]
format = "full"
color = false

[logging]
transparency_log = "/tmp/advisor.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reasoning.model, "local-model");
        assert_eq!(config.roster_kind().unwrap(), RosterKind::Incident);
        assert_eq!(config.approval_mode().unwrap(), ApprovalMode::Auto);
        assert_eq!(config.executor.kind, ExecutorKind::Webhook);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert_eq!(config.logging.transparency_log.as_deref(), Some("/tmp/advisor.jsonl"));
        assert!(config.validate().is_empty());

        let params = config.orchestrator_params();
        assert_eq!(params.reasoning_timeout, Duration::from_secs(12));
        assert_eq!(params.phase_timeout(), Duration::from_secs(17));
        assert_eq!(params.max_in_flight, 3);
        assert_eq!(params.execution_timeout, Duration::from_secs(45));
        assert_eq!(params.approval_mode, ApprovalMode::Auto);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[orchestrator]
roster = "nosql"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.roster_kind().unwrap(), RosterKind::Nosql);
        // Defaults should apply
        assert_eq!(config.reasoning.timeout_seconds, 30);
        assert_eq!(config.store.ttl_seconds, 3600);
        assert_eq!(config.executor.kind, ExecutorKind::DryRun);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = FileConfig::default();
        config.reasoning.timeout_seconds = 0;
        config.reasoning.temperature = 1.5;
        config.orchestrator.max_in_flight = 0;
        config.orchestrator.roster = "payroll".to_string();
        config.executor.kind = ExecutorKind::Webhook;

        let issues = config.validate();
        assert!(issues.contains(&ConfigValidationError::Zero("reasoning.timeout_seconds")));
        assert!(issues.contains(&ConfigValidationError::Zero("orchestrator.max_in_flight")));
        assert!(issues.contains(&ConfigValidationError::TemperatureOutOfRange(1.5)));
        assert!(issues.contains(&ConfigValidationError::MissingWebhookUrl));
        assert!(issues.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidValue { field: "orchestrator.roster", .. }
        )));
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn test_invalid_approval_mode_falls_back_to_manual() {
        let mut config = FileConfig::default();
        config.orchestrator.approval_mode = "yolo".to_string();
        assert!(config.approval_mode().is_err());
        assert_eq!(config.orchestrator_params().approval_mode, ApprovalMode::Manual);
    }
}
