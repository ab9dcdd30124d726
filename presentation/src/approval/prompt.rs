//! Interactive approval prompt.
//!
//! Shown when a session reaches `AWAITING_APPROVAL` and no decision was given
//! on the command line:
//!
//! ```text
//! ═══════════════════════════════════════════════════════════════
//!   Recommendation Requires Approval
//! ═══════════════════════════════════════════════════════════════
//!
//! Choice:      PostgreSQL
//! Confidence:  0.62
//! Risk flags:
//!   * PCI scope requires network isolation
//!
//! Commands:
//!   /approve  - Execute the recommendation
//!   /reject   - Finish without executing
//!
//! approve>
//! ```
//!
//! | Command | Aliases | Description |
//! |---------|---------|-------------|
//! | `/approve` | `approve`, `a`, `y`, `yes` | Execute the recommendation |
//! | `/reject` | `reject`, `r`, `n`, `no`, `q` | Reject it |
//!
//! End of input counts as a rejection.

use advisor_domain::Session;
use colored::Colorize;
use std::io::{self, BufRead, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Terminal prompt asking a human to approve or reject a recommendation.
pub struct InteractiveApproval;

impl InteractiveApproval {
    pub fn new() -> Self {
        Self
    }

    /// Ask on stdin, drawing the prompt on stderr.
    pub fn ask(&self, session: &Session) -> io::Result<bool> {
        let stdin = io::stdin();
        self.ask_with(session, stdin.lock(), io::stderr())
    }

    /// Ask using the given input and output streams.
    ///
    /// Returns `true` for approval.
    pub fn ask_with<R: BufRead, W: Write>(
        &self,
        session: &Session,
        mut input: R,
        mut output: W,
    ) -> io::Result<bool> {
        Self::display(session, &mut output)?;

        loop {
            write!(output, "{} ", "approve>".magenta().bold())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                writeln!(output, "{}", "✗ No answer, recommendation rejected".red())?;
                return Ok(false);
            }

            let command = line.trim();
            match command.to_lowercase().as_str() {
                "/approve" | "approve" | "a" | "y" | "yes" => {
                    writeln!(output, "{}", "✓ Recommendation approved".green())?;
                    return Ok(true);
                }
                "/reject" | "reject" | "r" | "n" | "no" | "q" => {
                    writeln!(output, "{}", "✗ Recommendation rejected".red())?;
                    return Ok(false);
                }
                "" => continue,
                _ => {
                    writeln!(output, "{} Unknown command: {}", "⚠️".yellow(), command.red())?;
                    writeln!(output, "Available commands: /approve, /reject")?;
                }
            }
        }
    }

    fn display<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", RULE.yellow().bold())?;
        writeln!(out, "{}", "  Recommendation Requires Approval".yellow().bold())?;
        writeln!(out, "{}", RULE.yellow().bold())?;
        writeln!(out)?;

        writeln!(out, "{} {}", "Session:".cyan().bold(), session.id())?;
        if let Some(recommendation) = session.recommendation() {
            writeln!(
                out,
                "{}     {}",
                "Choice:".cyan().bold(),
                recommendation
                    .primary_choice
                    .as_deref()
                    .unwrap_or("no recommendation")
            )?;
            writeln!(
                out,
                "{} {:.2}",
                "Confidence:".cyan().bold(),
                recommendation.aggregate_confidence
            )?;
            if !recommendation.risk_flags.is_empty() {
                writeln!(out, "{}", "Risk flags:".red().bold())?;
                for flag in &recommendation.risk_flags {
                    writeln!(out, "  * {}", flag)?;
                }
            }
            if !recommendation.dissenting_agents.is_empty() {
                writeln!(
                    out,
                    "{} {}",
                    "Dissenting:".yellow().bold(),
                    recommendation.dissenting_agents.join(", ")
                )?;
            }
        }
        writeln!(out)?;

        writeln!(out, "{}", "Commands:".cyan().bold())?;
        writeln!(out, "  {}  - Execute the recommendation", "/approve".green())?;
        writeln!(out, "  {}   - Finish without executing", "/reject".red())?;
        writeln!(out)
    }
}

impl Default for InteractiveApproval {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::{AnalysisInput, Recommendation, SessionState};
    use std::io::Cursor;

    fn session() -> Session {
        let mut session = Session::new("provisioning", AnalysisInput::new());
        session.transition(SessionState::Analyzing).unwrap();
        session
            .set_recommendation(Recommendation {
                primary_choice: Some("PostgreSQL".to_string()),
                chosen_by: Some("architect".to_string()),
                aggregate_confidence: 0.62,
                supporting_factors: vec![],
                dissenting_agents: vec![],
                risk_flags: vec!["PCI scope".to_string()],
                max_risk: 0.8,
                requires_approval: true,
            })
            .unwrap();
        session.transition(SessionState::AwaitingApproval).unwrap();
        session
    }

    fn answer(input: &str) -> (bool, String) {
        let mut out = Vec::new();
        let approved = InteractiveApproval::new()
            .ask_with(&session(), Cursor::new(input.to_string()), &mut out)
            .unwrap();
        (approved, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_approve() {
        let (approved, out) = answer("y\n");
        assert!(approved);
        assert!(out.contains("PostgreSQL"));
        assert!(out.contains("PCI scope"));
    }

    #[test]
    fn test_reject() {
        assert!(!answer("/reject\n").0);
        assert!(!answer("No\n").0);
    }

    #[test]
    fn test_unknown_then_empty_then_approve() {
        let (approved, out) = answer("maybe\n\n/approve\n");
        assert!(approved);
        assert!(out.contains("Unknown command"));
        assert!(out.contains("maybe"));
    }

    #[test]
    fn test_end_of_input_rejects() {
        let (approved, out) = answer("");
        assert!(!approved);
        assert!(out.contains("No answer"));
    }
}
