//! CLI command definitions

use advisor_domain::RosterKind;
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every agent result, then the recommendation
    Full,
    /// Only the recommendation
    Summary,
    /// The session snapshot as JSON
    Json,
}

impl From<OutputFormat> for advisor_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => advisor_domain::OutputFormat::Full,
            OutputFormat::Summary => advisor_domain::OutputFormat::Summary,
            OutputFormat::Json => advisor_domain::OutputFormat::Json,
        }
    }
}

/// Built-in agent rosters
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RosterArg {
    /// Database provisioning: workload, cost + security, architecture
    Provisioning,
    /// NoSQL selection: data model, scalability + cost, architecture
    Nosql,
    /// Incident response: logs + metrics, root cause, remediation
    Incident,
}

impl From<RosterArg> for RosterKind {
    fn from(roster: RosterArg) -> Self {
        match roster {
            RosterArg::Provisioning => RosterKind::Provisioning,
            RosterArg::Nosql => RosterKind::Nosql,
            RosterArg::Incident => RosterKind::Incident,
        }
    }
}

/// CLI arguments for advisor
#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(author, version, about = "Multi-agent analysis with a human approval gate")]
#[command(long_about = r#"
Advisor runs a roster of specialist agents over a JSON description of your
problem and turns their opinions into one recommendation.

Agents run in phases: agents of the same phase run concurrently, and each
phase sees everything earlier phases concluded. When the reasoning service is
unreachable an agent answers with a deterministic heuristic instead, at
reduced weight. Nothing is executed until the recommendation is approved.

Configuration files are loaded from (in priority order):
1. ADVISOR_* environment variables (e.g. ADVISOR_REASONING__MODEL)
2. --config <path>                 Explicit config file
3. ./advisor.toml                  Project-level config
4. ~/.config/advisor/config.toml   Global config

Example:
  advisor requirements.json
  advisor --roster nosql --set dataModel=document --set expectedQps=20000
  advisor --roster incident incident.json --offline -o json --reject
"#)]
pub struct Cli {
    /// JSON file holding the analysis input (an object)
    pub input: Option<PathBuf>,

    /// Agent roster to run (default: from config)
    #[arg(short, long, value_enum)]
    pub roster: Option<RosterArg>,

    /// Set one input field (repeatable); VALUE is parsed as JSON, else kept as text
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, Value)>,

    /// Approve the recommendation without prompting
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,

    /// Reject the recommendation without prompting
    #[arg(long)]
    pub reject: bool,

    /// Do not call the reasoning service; every agent uses its fallback
    #[arg(long)]
    pub offline: bool,

    /// Output format (default: from config, else summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append every agent exchange to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub transparency_log: Option<PathBuf>,
}

impl Cli {
    /// Decision given on the command line, if any.
    pub fn decision(&self) -> Option<bool> {
        match (self.approve, self.reject) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Parse `key=value`, reading the value as JSON when possible.
pub fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("expectedQps=2500").unwrap(), ("expectedQps".to_string(), json!(2500)));
        assert_eq!(parse_key_value("compliance=[\"PCI\"]").unwrap().1, json!(["PCI"]));
        assert_eq!(parse_key_value("workloadType=high-write").unwrap().1, json!("high-write"));
        assert_eq!(parse_key_value("note=a=b").unwrap().1, json!("a=b"));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn test_full_command_line() {
        let cli = Cli::try_parse_from([
            "advisor",
            "input.json",
            "--roster",
            "incident",
            "--set",
            "errorRate=0.2",
            "-s",
            "service=checkout",
            "--offline",
            "-o",
            "json",
            "-vv",
            "--approve",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("input.json")));
        assert_eq!(cli.roster, Some(RosterArg::Incident));
        assert_eq!(cli.set.len(), 2);
        assert!(cli.offline);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.decision(), Some(true));
    }

    #[test]
    fn test_approve_and_reject_conflict() {
        assert!(Cli::try_parse_from(["advisor", "--approve", "--reject"]).is_err());
        let cli = Cli::try_parse_from(["advisor", "--reject"]).unwrap();
        assert_eq!(cli.decision(), Some(false));
        assert_eq!(Cli::try_parse_from(["advisor"]).unwrap().decision(), None);
    }
}
