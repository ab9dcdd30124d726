//! CLI entrypoint for advisor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod input;

use advisor_application::{
    AnalysisOrchestrator, NoProgress, OrchestratorError, ProgressNotifier, ReasoningClient,
    TransparencySink,
};
use advisor_domain::{
    AnalysisInput, OutputFormat, Roster, RosterKind, SessionRepository, SessionState,
};
use advisor_infrastructure::{
    ConfigLoader, FileConfig, HttpReasoningClient, HttpReasoningConfig, InMemorySessionStore,
    JsonlTransparencySink, OfflineReasoningClient, executor_from_config,
};
use advisor_presentation::{
    Cli, ConsoleFormatter, InteractiveApproval, ProgressReporter, SimpleProgress,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("{}", e))?
    };

    if let Some(roster) = cli.roster {
        config.orchestrator.roster = RosterKind::from(roster).as_str().to_string();
    }
    if cli.offline {
        config.reasoning.offline = true;
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("invalid configuration ({} problem(s))", issues.len());
    }

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.as_ref().map(Into::into));
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting advisor");

    let input = input::load_input(cli.input.as_deref(), &cli.set)?;
    let roster = config.roster_kind()?.roster();

    // === Dependency Injection ===
    let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(
        config.store.ttl_seconds,
    )));
    let _sweeper = store.spawn_sweeper(Duration::from_secs(config.store.sweep_interval_seconds));

    let wiring = Wiring {
        roster,
        store,
        progress: progress_for(&cli, &config),
        transparency: transparency_for(&cli, &config),
        config,
    };

    let run = Run {
        input,
        decision: cli.decision(),
        format: cli
            .output
            .map(OutputFormat::from)
            .or(wiring.config.output.format)
            .unwrap_or_default(),
    };

    if wiring.config.reasoning.offline {
        info!("Offline mode: every agent answers with its fallback heuristic");
        run.execute(Arc::new(OfflineReasoningClient), wiring).await
    } else {
        let client = HttpReasoningClient::new(HttpReasoningConfig::from(&wiring.config.reasoning))?;
        run.execute(Arc::new(client), wiring).await
    }
}

/// Adapters shared by every reasoning client choice.
struct Wiring {
    config: FileConfig,
    roster: Roster,
    store: Arc<InMemorySessionStore>,
    progress: Arc<dyn ProgressNotifier>,
    transparency: Option<Arc<dyn TransparencySink>>,
}

/// One analysis request as given on the command line.
struct Run {
    input: AnalysisInput,
    decision: Option<bool>,
    format: OutputFormat,
}

impl Run {
    async fn execute<C: ReasoningClient + 'static>(
        self,
        client: Arc<C>,
        wiring: Wiring,
    ) -> Result<ExitCode> {
        let executor = executor_from_config(&wiring.config.executor)?;
        let store: Arc<dyn SessionRepository> = wiring.store;

        let mut orchestrator = AnalysisOrchestrator::new(client, wiring.roster, store, executor)
            .with_params(wiring.config.orchestrator_params())
            .with_progress(wiring.progress);
        if let Some(sink) = wiring.transparency {
            orchestrator = orchestrator.with_transparency(sink);
        }

        let mut session = orchestrator.analyze(self.input).await?;

        if session.state() == SessionState::AwaitingApproval {
            let approved = match self.decision {
                Some(approved) => Some(approved),
                None if std::io::stdin().is_terminal() => Some(
                    InteractiveApproval::new()
                        .ask(&session)
                        .context("Failed to read approval")?,
                ),
                None => {
                    warn!(
                        "No --approve/--reject given and stdin is not a terminal; \
                         leaving the session awaiting approval"
                    );
                    None
                }
            };

            if let Some(approved) = approved {
                session = match orchestrator.decide(&session.id(), approved).await {
                    Ok(session) => session,
                    Err(OrchestratorError::ExecutionFailed { session: id, message }) => {
                        warn!(session = %id, "Execution failed: {}", message);
                        orchestrator.get_session(&id)?
                    }
                    Err(e) => return Err(e.into()),
                };
            }
        }

        println!("{}", ConsoleFormatter::render(&session, self.format));

        Ok(if session.state() == SessionState::Failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

/// Install the tracing subscriber; the returned guard flushes the log file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn progress_for(cli: &Cli, config: &FileConfig) -> Arc<dyn ProgressNotifier> {
    if cli.quiet || !config.output.show_progress {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    }
}

fn transparency_for(cli: &Cli, config: &FileConfig) -> Option<Arc<dyn TransparencySink>> {
    let path = cli
        .transparency_log
        .clone()
        .or_else(|| config.logging.transparency_log.as_ref().map(Into::into))?;
    let sink = JsonlTransparencySink::new(&path)?;
    info!(path = %path.display(), "Writing transparency log");
    Some(Arc::new(sink))
}
