//! Prompt templates for agent roles

use crate::agent::role::AgentRole;
use crate::orchestration::context::AnalysisContext;

/// Templates for building each role's request to the reasoning service
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt describing the role
    pub fn system(role: AgentRole) -> &'static str {
        match role {
            AgentRole::Workload => {
                r#"You are a database workload analyst.
Classify the workload described in the requirements: its type, its dominant access pattern,
and the database engine that best matches it."#
            }
            AgentRole::DataModel => {
                r#"You are a data modelling specialist.
Determine the shape of the data described in the requirements and the NoSQL store that fits it best."#
            }
            AgentRole::Cost => {
                r#"You are a cloud cost analyst.
Estimate the monthly running cost of the most economical option that still satisfies the requirements
and the findings of earlier analysts."#
            }
            AgentRole::Security => {
                r#"You are a security and compliance reviewer.
Identify risks implied by the requirements (compliance regimes, exposure, data sensitivity)
and score the overall risk between 0 and 1."#
            }
            AgentRole::Scalability => {
                r#"You are a scalability reviewer.
Assess how the candidate datastore must scale for the stated load and score the scaling risk between 0 and 1."#
            }
            AgentRole::Architecture => {
                r#"You are a solution architect making the final technology decision.
Weigh every earlier finding, resolve conflicts between them, and commit to one technology."#
            }
            AgentRole::LogAnalysis => {
                r#"You are an incident log analyst.
Extract the distinct error patterns from the supplied logs and rate the incident severity."#
            }
            AgentRole::Metrics => {
                r#"You are a metrics analyst.
Identify anomalous readings in the supplied metrics, citing the metric and the value."#
            }
            AgentRole::RootCause => {
                r#"You are an incident investigator.
Form the single most probable root cause from the log and metric findings."#
            }
            AgentRole::Remediation => {
                r#"You are a remediation planner.
Propose one remediation action for the probable root cause, list its steps,
and score the risk of applying it between 0 and 1."#
            }
        }
    }

    /// User prompt embedding the requirements and earlier-phase findings
    pub fn agent_prompt(role: AgentRole, context: &AnalysisContext) -> String {
        let mut prompt = format!(
            r#"Role: {}

Requirements:
{}
"#,
            role.display_name(),
            context.input().to_pretty_json()
        );

        let prior = context.prior_results();
        if !prior.is_empty() {
            prompt.push_str("\nFindings from earlier phases:\n");
            for result in prior {
                prompt.push_str(&format!(
                    "\n--- {} ({}, phase {}, {}) ---\n",
                    result.agent_name, result.role, result.phase, result.status
                ));
                match &result.payload {
                    Some(payload) => {
                        prompt.push_str(&format!(
                            "Summary: {}\nConfidence: {:.2}\n",
                            payload.summary, payload.confidence
                        ));
                        if let Ok(details) = serde_json::to_string(&payload.details) {
                            prompt.push_str(&format!("Details: {}\n", details));
                        }
                    }
                    None => prompt.push_str("No contribution.\n"),
                }
            }
        }

        prompt.push_str(&Self::response_format(role));
        prompt
    }

    /// Instructions pinning the JSON shape of the response
    pub fn response_format(role: AgentRole) -> String {
        let fields = role
            .required_fields()
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"
Respond with a single JSON object and nothing else. It must contain the fields {}.
"confidence" is a number between 0 and 1; "summary" is one or two sentences."#,
            fields
        )
    }
}
