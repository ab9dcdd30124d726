//! Console output formatter for analysis sessions

use crate::output::formatter::OutputFormatter;
use advisor_domain::{AgentResult, AgentStatus, OutputFormat, Recommendation, Session, SessionState};
use colored::{ColoredString, Colorize};

/// Formats sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a session in the requested format
    pub fn render(session: &Session, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_full(session),
            OutputFormat::Summary => Self::format_summary(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Every agent result grouped by phase, then the recommendation
    pub fn format_full(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Analysis Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), session.id()));
        output.push_str(&format!("{} {}\n", "Roster:".cyan().bold(), session.roster()));
        output.push_str(&format!(
            "{} {}\n\n",
            "State:".cyan().bold(),
            Self::state_label(session.state())
        ));

        let phases = session
            .agent_results()
            .iter()
            .map(|r| r.phase)
            .max()
            .map_or(0, |last| last + 1);
        for phase in 0..phases {
            output.push_str(&Self::section_header(&format!("Phase {}", phase + 1)));
            for result in session.agent_results().iter().filter(|r| r.phase == phase) {
                output.push_str(&Self::agent_block(result));
            }
        }

        if let Some(recommendation) = session.recommendation() {
            output.push_str(&Self::section_header("Recommendation"));
            output.push('\n');
            output.push_str(&Self::recommendation_block(recommendation));
        }

        output.push_str(&Self::outcome_block(session));
        output.push_str(&Self::footer());

        output
    }

    /// The recommendation and where the session stands (concise output)
    pub fn format_summary(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Recommendation ===".cyan().bold()
        ));

        match session.recommendation() {
            Some(recommendation) => output.push_str(&Self::recommendation_block(recommendation)),
            None => output.push_str(&format!("{}\n", "No recommendation was produced.".dimmed())),
        }

        let consulted: Vec<&str> = session
            .agent_results()
            .iter()
            .map(|r| r.agent_name.as_str())
            .collect();
        if !consulted.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Agents consulted:".dimmed(),
                consulted.join(", ")
            ));
        }

        output.push_str(&Self::outcome_block(session));
        output
    }

    /// Format as JSON
    pub fn format_json(session: &Session) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    fn agent_block(result: &AgentResult) -> String {
        let title = format!(
            "── {} ({}) {} {:.2} ──",
            result.agent_name,
            result.role.display_name(),
            result.status,
            result.confidence()
        );
        let title = match result.status {
            AgentStatus::Ok => title.yellow().bold(),
            AgentStatus::Fallback => title.magenta().bold(),
            AgentStatus::Error => title.red().bold(),
        };

        let mut block = format!("\n{}\n", title);
        if let Some(summary) = result.summary() {
            block.push_str(&Self::indent(summary, "  "));
            block.push('\n');
        }
        if let Some(choice) = result.payload.as_ref().and_then(|p| p.details.choice()) {
            block.push_str(&format!("  {} {}\n", "Choice:".bold(), choice));
        }
        if let Some(failure) = &result.failure {
            block.push_str(&format!("  {} {}\n", "Reason:".dimmed(), failure));
        }
        block
    }

    fn recommendation_block(recommendation: &Recommendation) -> String {
        let mut block = String::new();

        let choice = recommendation
            .primary_choice
            .as_deref()
            .unwrap_or("no recommendation");
        block.push_str(&format!("{} {}\n", "Choice:".bold(), choice.green().bold()));
        if let Some(agent) = &recommendation.chosen_by {
            block.push_str(&format!("{} {}\n", "Chosen by:".bold(), agent));
        }
        block.push_str(&format!(
            "{} {:.2}\n",
            "Confidence:".bold(),
            recommendation.aggregate_confidence
        ));
        block.push_str(&format!("{} {:.2}\n", "Max risk:".bold(), recommendation.max_risk));
        if recommendation.requires_approval {
            block.push_str(&format!("{}\n", "Human approval required".yellow().bold()));
        }

        if !recommendation.supporting_factors.is_empty() {
            block.push_str(&format!("\n{}\n", "Supporting:".green().bold()));
            for factor in &recommendation.supporting_factors {
                block.push_str(&format!("  * {}: {}\n", factor.agent_name, factor.excerpt));
            }
        }

        if !recommendation.dissenting_agents.is_empty() {
            block.push_str(&format!(
                "\n{} {}\n",
                "Dissenting:".yellow().bold(),
                recommendation.dissenting_agents.join(", ")
            ));
        }

        if !recommendation.risk_flags.is_empty() {
            block.push_str(&format!("\n{}\n", "Risk flags:".red().bold()));
            for flag in &recommendation.risk_flags {
                block.push_str(&format!("  * {}\n", flag));
            }
        }

        block
    }

    fn outcome_block(session: &Session) -> String {
        let mut block = format!(
            "\n{} {}\n",
            "Status:".bold(),
            Self::state_label(session.state())
        );
        if let Some(outcome) = session.execution_outcome() {
            if let Some(artifact) = &outcome.artifact {
                let artifact =
                    serde_json::to_string_pretty(artifact).unwrap_or_else(|_| artifact.to_string());
                block.push_str(&format!("{}\n{}\n", "Execution:".bold(), Self::indent(&artifact, "  ")));
            }
            block.push_str(&format!(
                "{} {} ms\n",
                "Execution time:".dimmed(),
                outcome.duration_ms()
            ));
        }
        if let Some(failure) = session.failure() {
            block.push_str(&format!("{} {}\n", "Failure:".red().bold(), failure));
        }
        block
    }

    fn state_label(state: SessionState) -> ColoredString {
        match state {
            SessionState::Completed => state.as_str().green().bold(),
            SessionState::Failed | SessionState::Rejected => state.as_str().red().bold(),
            SessionState::AwaitingApproval => state.as_str().yellow().bold(),
            _ => state.as_str().normal(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, session: &Session) -> String {
        Self::format_full(session)
    }

    fn format_summary(&self, session: &Session) -> String {
        Self::format_summary(session)
    }

    fn format_json(&self, session: &Session) -> String {
        Self::format_json(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::{
        AgentRole, AgentSpec, AnalysisContext, AnalysisInput, SynthesisPolicy, Synthesizer,
        fallback_payload,
    };

    fn awaiting_session() -> Session {
        let input = AnalysisInput::new()
            .with("workloadType", "high-write")
            .with("expectedQps", 4000);
        let context = AnalysisContext::new(input.clone());
        let workload = AgentSpec::for_role(AgentRole::Workload);
        let architect = AgentSpec::for_role(AgentRole::Architecture);
        let results = vec![
            AgentResult::ok(&workload, 0, fallback_payload(AgentRole::Workload, &context)),
            AgentResult::error(&architect, 1, "missed phase barrier"),
        ];
        let recommendation = Synthesizer::new(SynthesisPolicy::default()).synthesize(&results);

        let mut session = Session::new("provisioning", input);
        session.transition(SessionState::Analyzing).unwrap();
        session.record_results(results).unwrap();
        session.set_recommendation(recommendation).unwrap();
        session.transition(SessionState::AwaitingApproval).unwrap();
        session
    }

    #[test]
    fn test_full_lists_every_phase_and_agent() {
        let session = awaiting_session();
        let output = ConsoleFormatter::format_full(&session);

        assert!(output.contains("Phase 1"));
        assert!(output.contains("Phase 2"));
        assert!(output.contains("missed phase barrier"));
        assert!(output.contains("Recommendation"));
        assert!(output.contains(&session.id().to_string()));
    }

    #[test]
    fn test_summary_shows_choice_and_state() {
        let session = awaiting_session();
        let choice = session
            .recommendation()
            .and_then(|r| r.primary_choice.clone())
            .unwrap();
        let output = ConsoleFormatter::format_summary(&session);

        assert!(output.contains(&choice));
        assert!(output.contains("AWAITING_APPROVAL"));
        assert!(!output.contains("Phase 2"));
    }

    #[test]
    fn test_summary_without_recommendation() {
        let mut session = Session::new("incident", AnalysisInput::new());
        session.fail("abandoned").unwrap();
        let output = ConsoleFormatter::render(&session, OutputFormat::Summary);

        assert!(output.contains("No recommendation was produced."));
        assert!(output.contains("abandoned"));
    }

    #[test]
    fn test_json_is_the_session_snapshot() {
        let session = awaiting_session();
        let output = ConsoleFormatter::render(&session, OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], session.id().to_string());
        assert_eq!(parsed["state"], "AWAITING_APPROVAL");
        assert_eq!(parsed["agent_results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_trait_object_matches_inherent_formatting() {
        let session = awaiting_session();
        let formatter: &dyn OutputFormatter = &ConsoleFormatter;
        assert_eq!(formatter.format_summary(&session), ConsoleFormatter::format_summary(&session));
        assert_eq!(formatter.format_json(&session), ConsoleFormatter::format_json(&session));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
