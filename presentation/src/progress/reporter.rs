//! Progress reporting for analysis sessions

use advisor_application::ProgressNotifier;
use advisor_domain::{AgentResult, AgentSpec, AgentStatus, Recommendation, SessionId, SessionState};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// Reports progress with one indicatif bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_name(phase: usize) -> String {
        format!("Phase {}", phase + 1)
    }

    fn status_mark(status: AgentStatus) -> colored::ColoredString {
        match status {
            AgentStatus::Ok => "v".green(),
            AgentStatus::Fallback => "~".yellow(),
            AgentStatus::Error => "x".red(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: usize, agents: &[AgentSpec]) {
        let pb = self.multi.add(ProgressBar::new(agents.len() as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_name(phase));
        pb.set_message("Starting...");

        *self.phase_bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_agent_complete(&self, _phase: usize, result: &AgentResult) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            pb.set_message(format!("{} {}", Self::status_mark(result.status), result.agent_name));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: usize) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_with_message(format!("{} complete!", Self::phase_name(phase).green()));
        }
    }

    fn on_recommendation(&self, _session: SessionId, recommendation: &Recommendation) {
        // Printing through the MultiProgress keeps the finished bars intact.
        let _ = self.multi.println(format!(
            "{} {}",
            "=>".cyan(),
            recommendation.headline().bold()
        ));
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so that stdout stays clean for the final output.
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: usize, agents: &[AgentSpec]) {
        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        eprintln!(
            "{} {} ({})",
            "->".cyan(),
            ProgressReporter::phase_name(phase).bold(),
            names.join(", ")
        );
    }

    fn on_agent_complete(&self, _phase: usize, result: &AgentResult) {
        match &result.failure {
            Some(reason) => eprintln!(
                "  {} {} ({}: {})",
                ProgressReporter::status_mark(result.status),
                result.agent_name,
                result.status,
                reason
            ),
            None => eprintln!(
                "  {} {}",
                ProgressReporter::status_mark(result.status),
                result.agent_name
            ),
        }
    }

    fn on_phase_complete(&self, _phase: usize) {
        eprintln!();
    }

    fn on_state_change(&self, session: SessionId, state: SessionState) {
        eprintln!("{} session {} is {}", "..".dimmed(), session, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::AgentRole;

    #[test]
    fn test_phase_names_are_one_based() {
        assert_eq!(ProgressReporter::phase_name(0), "Phase 1");
        assert_eq!(ProgressReporter::phase_name(2), "Phase 3");
    }

    #[test]
    fn test_reporter_tracks_one_bar_per_phase() {
        let reporter = ProgressReporter::new();
        let agents = vec![
            AgentSpec::for_role(AgentRole::LogAnalysis),
            AgentSpec::for_role(AgentRole::Metrics),
        ];

        reporter.on_phase_start(0, &agents);
        reporter.on_agent_complete(0, &AgentResult::error(&agents[0], 0, "timeout"));
        {
            let bar = reporter.phase_bar.lock().unwrap();
            let bar = bar.as_ref().unwrap();
            assert_eq!(bar.length(), Some(2));
            assert_eq!(bar.position(), 1);
        }

        reporter.on_phase_complete(0);
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }
}
