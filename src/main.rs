//! decision-debt - command line entry point
//!
//! Loads configuration, initializes logging and dispatches to the analysis
//! handlers. Reports go to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use decision_debt::{
    adapters::{FileRecordSource, JsonReportWriter, NarrativeImporter, NarrativeRecordSource, ReportTarget},
    application::{
        AnalyzeContextsCommand, AnalyzeContextsHandler, CandidateSelection, RecommendActionsCommand,
        RecommendActionsHandler,
    },
    config::{AppConfig, LoggingConfig},
    domain::foundation::{ContextId, DomainError, ErrorCode, RecordId},
    ports::RecordSource,
};

#[derive(Debug, Parser)]
#[command(name = "decision-debt", version, about = "Causal chain analysis and decision debt scoring")]
struct Cli {
    /// Config file (TOML, YAML or JSON); environment variables take precedence
    #[arg(long, global = true, env = "DECISION_DEBT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze every context (or the selected ones) and print the report
    Analyze {
        /// Snapshot file; defaults to `source.snapshot` from configuration
        snapshot: Option<PathBuf>,

        /// Restrict the run to these contexts
        #[arg(long = "context")]
        contexts: Vec<ContextId>,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rank candidate actions for an open cause
    Recommend {
        /// Snapshot file; defaults to `source.snapshot` from configuration
        snapshot: Option<PathBuf>,

        #[arg(long)]
        cause: RecordId,

        /// Candidate action; when omitted, actions of the cause's context it does not yet reach are ranked
        #[arg(long = "candidate")]
        candidates: Vec<RecordId>,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Convert a narrative text file into a record snapshot
    Import {
        /// Plain text narrative
        input: PathBuf,

        #[arg(long)]
        context: ContextId,

        /// Snapshot file to write (`.json`, `.yaml` or `.yml`)
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(&config.logging);

    if let Err(e) = run(cli.command, &config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let settings = config.validate()?;

    match command {
        Command::Analyze {
            snapshot,
            contexts,
            output,
        } => {
            let source = snapshot_source(snapshot.as_deref(), config)?;
            let handler = AnalyzeContextsHandler::new(source, report_writer(output), settings);

            let cmd = if contexts.is_empty() {
                AnalyzeContextsCommand::all()
            } else {
                AnalyzeContextsCommand::only(contexts)
            };
            let report = handler.handle(cmd).await?;

            let failed = report.failed_contexts().count();
            if failed > 0 {
                info!(failed, "Some contexts could not be analyzed");
            }
        }

        Command::Recommend {
            snapshot,
            cause,
            candidates,
            output,
        } => {
            let source = snapshot_source(snapshot.as_deref(), config)?;
            let handler = RecommendActionsHandler::new(source, report_writer(output), settings);

            let candidates = if candidates.is_empty() {
                CandidateSelection::FromHistory
            } else {
                CandidateSelection::Explicit(candidates)
            };
            handler
                .handle(RecommendActionsCommand { cause, candidates })
                .await?;
        }

        Command::Import {
            input,
            context,
            output,
        } => {
            let source = NarrativeRecordSource::new(&input, NarrativeImporter::new(context));
            let snapshot = source.load_snapshot().await?;
            let records = snapshot.len();

            FileRecordSource::new(&output)
                .write_snapshot(snapshot)
                .await?;
            info!(input = %input.display(), output = %output.display(), records, "Narrative imported");
        }
    }

    Ok(())
}

fn snapshot_source(
    path: Option<&Path>,
    config: &AppConfig,
) -> Result<Arc<dyn RecordSource>, DomainError> {
    let path = path.or(config.source.snapshot.as_deref()).ok_or_else(|| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            "No snapshot given and source.snapshot is not configured",
        )
    })?;
    Ok(Arc::new(FileRecordSource::new(path)))
}

fn report_writer(output: Option<PathBuf>) -> Arc<JsonReportWriter> {
    match output {
        Some(path) => Arc::new(JsonReportWriter::new(ReportTarget::File(path))),
        None => Arc::new(JsonReportWriter::stdout()),
    }
}
