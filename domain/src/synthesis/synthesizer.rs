//! Synthesizer
//!
//! Merges agent results into one [`Recommendation`]. Pure: the output depends
//! only on the results passed in.

use crate::agent::result::{AgentResult, AgentStatus};
use crate::synthesis::recommendation::{Recommendation, SupportingFactor};
use crate::util::excerpt;
use std::cmp::Ordering;

/// Risk above which a recommendation always needs human approval.
pub const RISK_THRESHOLD: f64 = 0.7;

/// Aggregate confidence below which a recommendation needs human approval.
pub const CONFIDENCE_FLOOR: f64 = 0.7;

const EXCERPT_LEN: usize = 160;

/// Thresholds applied when deciding whether approval is required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisPolicy {
    pub risk_threshold: f64,
    pub confidence_floor: f64,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            risk_threshold: RISK_THRESHOLD,
            confidence_floor: CONFIDENCE_FLOOR,
        }
    }
}

/// A result as the synthesizer sees it after sanitizing.
#[derive(Debug, Clone, Copy)]
struct Effective<'a> {
    index: usize,
    result: &'a AgentResult,
    status: AgentStatus,
    confidence: f64,
}

impl<'a> Effective<'a> {
    /// Missing or out-of-range confidence counts as 0 and demotes the agent to `FALLBACK`.
    fn of(index: usize, result: &'a AgentResult) -> Self {
        let (status, confidence) = match (result.status, &result.payload) {
            (AgentStatus::Error, _) => (AgentStatus::Error, 0.0),
            (status, Some(p)) if (0.0..=1.0).contains(&p.confidence) => (status, p.confidence),
            _ => (AgentStatus::Fallback, 0.0),
        };
        Self {
            index,
            result,
            status,
            confidence,
        }
    }

    fn contributes(&self) -> bool {
        self.status != AgentStatus::Error && self.result.payload.is_some()
    }

    fn choice(&self) -> Option<&'a str> {
        self.result.payload.as_ref()?.details.choice()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
    policy: SynthesisPolicy,
}

impl Synthesizer {
    pub fn new(policy: SynthesisPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SynthesisPolicy {
        &self.policy
    }

    pub fn synthesize(&self, results: &[AgentResult]) -> Recommendation {
        let effective: Vec<Effective<'_>> = results
            .iter()
            .enumerate()
            .map(|(i, r)| Effective::of(i, r))
            .collect();

        let (aggregate_confidence, weighted_agents) = aggregate(&effective);

        let chosen = effective
            .iter()
            .filter(|e| e.contributes() && e.choice().is_some())
            .min_by(|a, b| rank(a, b));
        let primary_choice = chosen.and_then(|e| e.choice()).map(str::to_string);

        let mut supporting_factors = Vec::new();
        let mut dissenting_agents = Vec::new();
        let ordered = chosen
            .into_iter()
            .chain(effective.iter().filter(|e| Some(e.index) != chosen.map(|c| c.index)));
        for e in ordered.filter(|e| e.contributes()) {
            let agrees = match (e.choice(), primary_choice.as_deref()) {
                (Some(choice), Some(primary)) => choice.eq_ignore_ascii_case(primary),
                (Some(_), None) => false,
                (None, _) => true,
            };
            if agrees {
                supporting_factors.push(SupportingFactor {
                    agent_name: e.result.agent_name.clone(),
                    role: e.result.role,
                    excerpt: e.result.summary().map(|s| excerpt(s, EXCERPT_LEN)).unwrap_or_default(),
                });
            } else {
                dissenting_agents.push(e.result.agent_name.clone());
            }
        }

        let mut risk_flags: Vec<String> = Vec::new();
        let mut max_risk: f64 = 0.0;
        for e in effective.iter().filter(|e| e.contributes()) {
            if let Some(payload) = &e.result.payload {
                max_risk = max_risk.max(payload.details.risk_score());
                for flag in payload.details.risk_flags() {
                    if !risk_flags.contains(flag) {
                        risk_flags.push(flag.clone());
                    }
                }
            }
        }

        let requires_approval = weighted_agents == 0
            || primary_choice.is_none()
            || aggregate_confidence < self.policy.confidence_floor
            || max_risk > self.policy.risk_threshold;

        Recommendation {
            chosen_by: chosen.map(|e| e.result.agent_name.clone()),
            primary_choice,
            aggregate_confidence,
            supporting_factors,
            dissenting_agents,
            risk_flags,
            max_risk,
            requires_approval,
        }
    }
}

/// Weighted aggregate confidence: `sum(weight * confidence) / n`, where `n`
/// counts agents with nonzero weight. Returns the aggregate and `n`.
fn aggregate(effective: &[Effective<'_>]) -> (f64, usize) {
    let weighted: Vec<f64> = effective
        .iter()
        .filter(|e| e.status.weight() > 0.0)
        .map(|e| e.status.weight() * e.confidence)
        .collect();
    if weighted.is_empty() {
        return (0.0, 0);
    }
    let value = weighted.iter().sum::<f64>() / weighted.len() as f64;
    (value.clamp(0.0, 1.0), weighted.len())
}

/// Role precedence first, then higher confidence, then earlier position.
fn rank(a: &Effective<'_>, b: &Effective<'_>) -> Ordering {
    a.result
        .role
        .precedence()
        .cmp(&b.result.role.precedence())
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.index.cmp(&b.index))
}

/// Aggregate confidence of `results` under the standard weighting.
pub fn aggregate_confidence(results: &[AgentResult]) -> f64 {
    let effective: Vec<Effective<'_>> = results
        .iter()
        .enumerate()
        .map(|(i, r)| Effective::of(i, r))
        .collect();
    aggregate(&effective).0
}
