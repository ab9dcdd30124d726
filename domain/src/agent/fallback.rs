//! Deterministic fallback payloads
//!
//! When remote reasoning is unavailable or unusable, each role derives a
//! conservative default from static heuristics over the visible context.
//! No randomness and no clock: the same context always yields the same payload.

use crate::agent::payload::{
    AgentPayload, ArchitectureDecision, CostEstimate, DataModelAssessment, LogFindings,
    MetricFindings, RemediationPlan, RoleDetails, RootCauseHypothesis, ScalabilityReview,
    SecurityReview, WorkloadAssessment,
};
use crate::agent::role::AgentRole;
use crate::core::input::AnalysisInput;
use crate::orchestration::context::AnalysisContext;
use crate::util::truncate_str;
use std::collections::BTreeSet;

/// Fixed confidence of every fallback payload.
///
/// Kept below the range successful calls report so callers can always tell
/// heuristic defaults from real reasoning.
pub const FALLBACK_CONFIDENCE: f64 = 0.75;

/// Ceiling for heuristic amounts so absurd inputs still yield a finite estimate
const MAX_AMOUNT: f64 = 1.0e12;

const MAX_LOG_PATTERNS: usize = 5;
const MAX_PATTERN_LEN: usize = 120;

const LOG_KEYWORDS: &[&str] = &[
    "error",
    "exception",
    "timeout",
    "timed out",
    "refused",
    "oom",
    "out of memory",
    "panic",
    "fatal",
];

/// Build the fallback payload for `role` from `context`.
pub fn fallback_payload(role: AgentRole, context: &AnalysisContext) -> AgentPayload {
    let input = context.input();
    let (summary, details) = match role {
        AgentRole::Workload => workload(input),
        AgentRole::DataModel => data_model(input),
        AgentRole::Cost => cost(context),
        AgentRole::Security => security(input),
        AgentRole::Scalability => scalability(input),
        AgentRole::Architecture => architecture(context),
        AgentRole::LogAnalysis => log_analysis(input),
        AgentRole::Metrics => metrics(input),
        AgentRole::RootCause => root_cause(context),
        AgentRole::Remediation => remediation(context),
    };
    AgentPayload::new(FALLBACK_CONFIDENCE, summary, details)
}

fn lower(input: &AnalysisInput, key: &str) -> Option<String> {
    input.get_str(key).map(|s| s.trim().to_lowercase())
}

fn engine_for_workload(workload_type: &str) -> &'static str {
    if workload_type.contains("write") {
        "dynamodb"
    } else if workload_type.contains("analytic") || workload_type.contains("olap") {
        "redshift"
    } else if workload_type.contains("read") {
        "aurora-postgresql"
    } else {
        "postgresql"
    }
}

fn workload(input: &AnalysisInput) -> (String, RoleDetails) {
    let workload_type = lower(input, "workloadType").unwrap_or_else(|| "general".to_string());
    let access_pattern = lower(input, "accessPattern").unwrap_or_else(|| {
        if workload_type.contains("write") {
            "write-heavy".to_string()
        } else if workload_type.contains("read") {
            "read-heavy".to_string()
        } else if workload_type.contains("analytic") {
            "scan-heavy".to_string()
        } else {
            "mixed".to_string()
        }
    });
    let engine = engine_for_workload(&workload_type);

    (
        format!(
            "Heuristic assessment: {} workload with {} access; defaulting to {}",
            workload_type, access_pattern, engine
        ),
        RoleDetails::Workload(WorkloadAssessment {
            workload_type,
            access_pattern,
            suggested_engine: engine.to_string(),
        }),
    )
}

fn data_model(input: &AnalysisInput) -> (String, RoleDetails) {
    let declared = lower(input, "dataModel").unwrap_or_default();
    let (shape, store) = if declared.contains("document") || declared.contains("json") {
        ("document", "mongodb")
    } else if declared.contains("graph") {
        ("graph", "neptune")
    } else if declared.contains("column") {
        ("wide-column", "cassandra")
    } else if declared.contains("time") {
        ("time-series", "timestream")
    } else {
        ("key-value", "dynamodb")
    };

    (
        format!(
            "Heuristic assessment: {} data maps to {}",
            shape, store
        ),
        RoleDetails::DataModel(DataModelAssessment {
            data_shape: shape.to_string(),
            suggested_store: store.to_string(),
        }),
    )
}

fn base_monthly_cost(option: &str) -> f64 {
    match option {
        "dynamodb" => 250.0,
        "timestream" => 280.0,
        "postgresql" => 300.0,
        "mongodb" => 350.0,
        "aurora-postgresql" => 420.0,
        "neptune" => 500.0,
        "cassandra" => 600.0,
        "redshift" => 900.0,
        _ => 400.0,
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount.clamp(0.0, MAX_AMOUNT) * 100.0).round() / 100.0
}

fn cost(context: &AnalysisContext) -> (String, RoleDetails) {
    let input = context.input();
    let option = context
        .leading_choice()
        .map(|(_, choice)| choice.to_string())
        .unwrap_or_else(|| {
            let workload_type = lower(input, "workloadType").unwrap_or_default();
            engine_for_workload(&workload_type).to_string()
        });

    let storage_gb = input.get_f64("storageGb").unwrap_or(100.0).max(0.0);
    let expected_qps = input.get_f64("expectedQps").unwrap_or(0.0).max(0.0);
    let monthly = round_cents(
        base_monthly_cost(&option) * (1.0 + storage_gb / 1000.0) + expected_qps * 0.02,
    );

    (
        format!(
            "Heuristic estimate: {} at about ${:.2}/month for {} GB",
            option, monthly, storage_gb
        ),
        RoleDetails::Cost(CostEstimate {
            recommended_option: option,
            monthly_cost_usd: monthly,
        }),
    )
}

fn security(input: &AnalysisInput) -> (String, RoleDetails) {
    let mut flags: Vec<String> = input
        .get_list("compliance")
        .into_iter()
        .map(|c| format!("compliance: {} requires encryption at rest and audit logging", c))
        .collect();
    if input.get_bool("publicAccess") == Some(true) {
        flags.push("network: public access requested".to_string());
    }
    if input.get_bool("encryption") == Some(false) {
        flags.push("data: encryption disabled".to_string());
    }
    if input.get_bool("containsPii") == Some(true) {
        flags.push("data: personal data in scope".to_string());
    }

    let risk = round_cents((0.2 + 0.2 * flags.len() as f64).min(1.0));
    let summary = if flags.is_empty() {
        "Heuristic review: no explicit security requirements; baseline risk".to_string()
    } else {
        format!("Heuristic review: {} risk flag(s) raised", flags.len())
    };

    (
        summary,
        RoleDetails::Security(SecurityReview {
            risk_score: risk,
            risk_flags: flags,
        }),
    )
}

fn scalability(input: &AnalysisInput) -> (String, RoleDetails) {
    let qps = input.get_f64("expectedQps").unwrap_or(1000.0);
    let (strategy, risk) = if qps >= 50_000.0 {
        ("horizontal-sharding", 0.8)
    } else if qps >= 10_000.0 {
        ("horizontal-sharding", 0.5)
    } else if qps >= 2_000.0 {
        ("read-replicas", 0.3)
    } else {
        ("vertical-scaling", 0.2)
    };

    (
        format!(
            "Heuristic review: {} qps suggests {}",
            qps, strategy
        ),
        RoleDetails::Scalability(ScalabilityReview {
            scaling_strategy: strategy.to_string(),
            risk_score: risk,
        }),
    )
}

fn architecture(context: &AnalysisContext) -> (String, RoleDetails) {
    let technology = context
        .leading_choice()
        .map(|(_, choice)| choice.to_string())
        .unwrap_or_else(|| {
            let workload_type = lower(context.input(), "workloadType").unwrap_or_default();
            engine_for_workload(&workload_type).to_string()
        });

    let evidence: Vec<String> = context
        .prior_results()
        .iter()
        .filter_map(|r| {
            let choice = r.payload.as_ref()?.details.choice()?;
            Some(format!("{}={}", r.agent_name, choice))
        })
        .collect();
    let rationale = if evidence.is_empty() {
        "No earlier findings; defaulted from the declared workload".to_string()
    } else {
        format!("Derived from earlier findings: {}", evidence.join(", "))
    };

    (
        format!("Heuristic decision: adopt {}", technology),
        RoleDetails::Architecture(ArchitectureDecision {
            recommended_technology: technology,
            rationale,
        }),
    )
}

fn log_analysis(input: &AnalysisInput) -> (String, RoleDetails) {
    let matching: Vec<String> = input
        .get_list("logs")
        .iter()
        .map(|line| line.trim())
        .filter(|line| {
            let lowered = line.to_lowercase();
            LOG_KEYWORDS.iter().any(|k| lowered.contains(k))
        })
        .map(|line| truncate_str(line, MAX_PATTERN_LEN).to_string())
        .collect();

    let critical = matching.iter().any(|line| {
        let lowered = line.to_lowercase();
        ["fatal", "panic", "out of memory", "oom"]
            .iter()
            .any(|k| lowered.contains(k))
    });
    let severity = if critical {
        "critical"
    } else if matching.len() >= 5 {
        "high"
    } else if !matching.is_empty() {
        "medium"
    } else {
        "low"
    };

    let patterns: Vec<String> = matching
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_LOG_PATTERNS)
        .collect();

    (
        format!(
            "Heuristic scan: {} distinct error pattern(s), severity {}",
            patterns.len(),
            severity
        ),
        RoleDetails::LogAnalysis(LogFindings {
            error_patterns: patterns,
            severity: severity.to_string(),
        }),
    )
}

fn metric_threshold(name: &str) -> Option<f64> {
    let name = name.to_lowercase();
    if name.contains("cpu") {
        Some(80.0)
    } else if name.contains("mem") {
        Some(85.0)
    } else if name.contains("error") {
        Some(0.05)
    } else if name.contains("latency") {
        Some(1000.0)
    } else {
        None
    }
}

fn metrics(input: &AnalysisInput) -> (String, RoleDetails) {
    let anomalies: Vec<String> = input
        .get_numbers("metrics")
        .into_iter()
        .filter_map(|(name, value)| {
            let threshold = metric_threshold(&name)?;
            (value > threshold).then(|| format!("{} at {} (threshold {})", name, value, threshold))
        })
        .collect();

    (
        format!("Heuristic check: {} metric(s) above threshold", anomalies.len()),
        RoleDetails::Metrics(MetricFindings { anomalies }),
    )
}

fn root_cause(context: &AnalysisContext) -> (String, RoleDetails) {
    let evidence = context
        .prior_results()
        .iter()
        .filter_map(|r| r.payload.as_ref())
        .flat_map(|p| match &p.details {
            RoleDetails::LogAnalysis(l) => l.error_patterns.clone(),
            RoleDetails::Metrics(m) => m.anomalies.clone(),
            _ => Vec::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    let cause = if evidence.contains("memory") || evidence.contains("oom") || evidence.contains("mem") {
        "memory exhaustion"
    } else if evidence.contains("timeout") || evidence.contains("timed out") || evidence.contains("latency") {
        "downstream dependency timeout"
    } else if evidence.contains("connection") || evidence.contains("refused") {
        "connection pool exhaustion"
    } else if evidence.contains("cpu") {
        "cpu saturation"
    } else {
        "undetermined"
    };

    (
        format!("Heuristic hypothesis: {}", cause),
        RoleDetails::RootCause(RootCauseHypothesis {
            probable_cause: cause.to_string(),
        }),
    )
}

fn remediation(context: &AnalysisContext) -> (String, RoleDetails) {
    let cause = context
        .payload_for(AgentRole::RootCause)
        .and_then(|p| p.details.choice())
        .unwrap_or("undetermined")
        .to_lowercase();

    let (action, risk, steps): (&str, f64, &[&str]) = if cause.contains("memory") {
        (
            "restart-with-increased-memory",
            0.4,
            &["raise the memory limit", "rolling restart of affected instances"],
        )
    } else if cause.contains("timeout") {
        (
            "enable-circuit-breaker",
            0.3,
            &["enable the circuit breaker on the failing dependency", "raise client timeouts"],
        )
    } else if cause.contains("connection") {
        (
            "scale-connection-pool",
            0.3,
            &["increase the connection pool size", "recycle idle connections"],
        )
    } else if cause.contains("cpu") {
        (
            "scale-out-instances",
            0.3,
            &["add instances behind the load balancer"],
        )
    } else {
        (
            "escalate-to-on-call",
            0.8,
            &["page the on-call engineer", "attach collected evidence"],
        )
    };

    (
        format!("Heuristic plan: {} for {}", action, cause),
        RoleDetails::Remediation(RemediationPlan {
            action: action.to_string(),
            risk_score: risk,
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::result::AgentResult;
    use crate::orchestration::roster::AgentSpec;
    use serde_json::json;

    fn ctx(input: serde_json::Value) -> AnalysisContext {
        AnalysisContext::new(AnalysisInput::from_value(input).unwrap())
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let context = ctx(json!({"workloadType": "high-write", "compliance": ["X"]}));
        for role in AgentRole::ALL {
            let a = serde_json::to_vec(&fallback_payload(role, &context)).unwrap();
            let b = serde_json::to_vec(&fallback_payload(role, &context)).unwrap();
            assert_eq!(a, b, "{role}");
        }
    }

    #[test]
    fn test_fallback_confidence_is_fixed_and_valid() {
        let context = ctx(json!({}));
        for role in AgentRole::ALL {
            let payload = fallback_payload(role, &context);
            assert_eq!(payload.confidence, FALLBACK_CONFIDENCE);
            assert_eq!(payload.role(), role);
            let value = serde_json::to_value(&payload).unwrap();
            // A fallback must itself satisfy the payload contract.
            assert!(AgentPayload::from_response(role, &value).is_ok(), "{role}");
        }
    }

    #[test]
    fn test_write_heavy_workload_suggests_dynamodb() {
        let payload = fallback_payload(AgentRole::Workload, &ctx(json!({"workloadType": "High-Write"})));
        assert_eq!(payload.details.choice(), Some("dynamodb"));
    }

    #[test]
    fn test_security_flags_compliance() {
        let payload = fallback_payload(
            AgentRole::Security,
            &ctx(json!({"compliance": ["HIPAA"], "publicAccess": true})),
        );
        assert_eq!(payload.details.risk_flags().len(), 2);
        assert_eq!(payload.details.risk_score(), 0.6);
    }

    #[test]
    fn test_cost_follows_earlier_choice() {
        let workload = AgentResult::ok(
            &AgentSpec::for_role(AgentRole::Workload),
            0,
            fallback_payload(AgentRole::Workload, &ctx(json!({"workloadType": "read-heavy"}))),
        );
        let context = ctx(json!({"storageGb": 1000})).with_results([workload]);
        let payload = fallback_payload(AgentRole::Cost, &context);
        match payload.details {
            RoleDetails::Cost(c) => {
                assert_eq!(c.recommended_option, "aurora-postgresql");
                assert_eq!(c.monthly_cost_usd, 840.0);
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn test_cost_saturates_on_huge_storage() {
        let context = ctx(json!({"storageGb": 1e308, "expectedQps": 1e308}));
        let payload = fallback_payload(AgentRole::Cost, &context);
        match &payload.details {
            RoleDetails::Cost(c) => {
                assert!(c.monthly_cost_usd.is_finite());
                assert_eq!(c.monthly_cost_usd, MAX_AMOUNT);
            }
            other => panic!("unexpected details: {other:?}"),
        }
        let value = serde_json::to_value(&payload).unwrap();
        assert!(AgentPayload::from_response(AgentRole::Cost, &value).is_ok());
    }

    #[test]
    fn test_incident_chain_without_remote() {
        let context = ctx(json!({
            "logs": ["INFO ok", "ERROR java.lang.OutOfMemoryError: heap", "ERROR out of memory"],
            "metrics": {"memory_percent": 97.0, "cpu_percent": 40.0}
        }));
        let logs = fallback_payload(AgentRole::LogAnalysis, &context);
        let metrics = fallback_payload(AgentRole::Metrics, &context);
        match &logs.details {
            RoleDetails::LogAnalysis(l) => {
                assert_eq!(l.severity, "critical");
                assert_eq!(l.error_patterns.len(), 2);
            }
            other => panic!("unexpected details: {other:?}"),
        }
        assert_eq!(metrics.details.risk_flags().len(), 1);

        let context = context.with_results([
            AgentResult::ok(&AgentSpec::for_role(AgentRole::LogAnalysis), 0, logs),
            AgentResult::ok(&AgentSpec::for_role(AgentRole::Metrics), 0, metrics),
        ]);
        let cause = fallback_payload(AgentRole::RootCause, &context);
        assert_eq!(cause.details.choice(), Some("memory exhaustion"));

        let context = context.with_results([AgentResult::ok(
            &AgentSpec::for_role(AgentRole::RootCause),
            1,
            cause,
        )]);
        let plan = fallback_payload(AgentRole::Remediation, &context);
        assert_eq!(plan.details.choice(), Some("restart-with-increased-memory"));
    }

    #[test]
    fn test_unknown_cause_escalates_with_high_risk() {
        let plan = fallback_payload(AgentRole::Remediation, &ctx(json!({})));
        assert_eq!(plan.details.choice(), Some("escalate-to-on-call"));
        assert!(plan.details.risk_score() > 0.7);
    }
}
