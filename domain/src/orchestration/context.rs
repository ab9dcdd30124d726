//! Read-only analysis context handed to agents

use crate::agent::payload::AgentPayload;
use crate::agent::result::AgentResult;
use crate::agent::role::AgentRole;
use crate::core::input::AnalysisInput;

/// The session input plus every result from strictly earlier phases.
///
/// A phase receives a snapshot taken before it starts, so same-phase agents
/// never see each other's output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisContext {
    input: AnalysisInput,
    prior: Vec<AgentResult>,
}

impl AnalysisContext {
    pub fn new(input: AnalysisInput) -> Self {
        Self {
            input,
            prior: Vec::new(),
        }
    }

    pub fn with_results(mut self, results: impl IntoIterator<Item = AgentResult>) -> Self {
        self.extend(results);
        self
    }

    /// Append the results of a finished phase.
    pub fn extend(&mut self, results: impl IntoIterator<Item = AgentResult>) {
        self.prior.extend(results);
    }

    pub fn input(&self) -> &AnalysisInput {
        &self.input
    }

    pub fn prior_results(&self) -> &[AgentResult] {
        &self.prior
    }

    /// Highest-confidence payload produced by an earlier agent of `role`.
    pub fn payload_for(&self, role: AgentRole) -> Option<&AgentPayload> {
        self.prior
            .iter()
            .filter(|r| r.role == role)
            .filter_map(|r| r.payload.as_ref())
            .fold(None, |best: Option<&AgentPayload>, p| match best {
                Some(b) if b.confidence >= p.confidence => Some(b),
                _ => Some(p),
            })
    }

    /// Choice stated by the most authoritative earlier agent, if any.
    ///
    /// Ranked by role precedence, then confidence, then position.
    pub fn leading_choice(&self) -> Option<(&AgentResult, &str)> {
        self.prior
            .iter()
            .filter_map(|r| {
                let choice = r.payload.as_ref()?.details.choice()?;
                Some((r, choice))
            })
            .fold(None, |best, candidate| match best {
                Some((b, _)) if !outranks(candidate.0, b) => best,
                _ => Some(candidate),
            })
    }
}

fn outranks(candidate: &AgentResult, current: &AgentResult) -> bool {
    let (cp, bp) = (candidate.role.precedence(), current.role.precedence());
    cp < bp || (cp == bp && candidate.confidence() > current.confidence())
}
