//! # sov-cli
//!
//! Command-line interface for the sovereignty engine.
//!
//! - `sov check <skill>` — run one invocation through the interceptor
//! - `sov identity` / `sov sovereignty` — inspect the loaded trust snapshot
//! - `sov registry list/show/requiring/permitted` — browse requirements
//! - `sov audit query/stats/fail-open` — read the audit trails
//! - `sov heat show/review` — inspect and reset heat cells
//! - `sov stability check/report/export` — the daily stability monitor

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sov_interceptor::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Sovereignty engine CLI — permission checks, audit, and stability.
#[derive(Parser)]
#[command(name = "sov", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".", global = true)]
    project_root: PathBuf,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a skill (or tool) through the permission interceptor.
    Check {
        /// Skill name, or tool name with --tool.
        name: String,
        /// Treat NAME as a tool name instead of a skill name.
        #[arg(long)]
        tool: bool,
        /// Evaluate without writing audit, heat, drift or fail-open records.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the identity vector derived from the current trust snapshot.
    Identity,
    /// Compute sovereignty and the grade recovery path.
    Sovereignty {
        /// Compute from a unit count instead of the scores artifact.
        #[arg(long)]
        units: Option<u64>,
        /// Drift events to apply (defaults to the drift log count).
        #[arg(long)]
        drift: Option<u64>,
    },
    /// Browse action requirements.
    Registry {
        #[command(subcommand)]
        command: commands::registry::RegistryCommands,
    },
    /// Query the permission audit trails.
    Audit {
        #[command(subcommand)]
        command: commands::audit::AuditCommands,
    },
    /// Inspect and review heat cells.
    Heat {
        #[command(subcommand)]
        command: commands::heat::HeatCommands,
    },
    /// Record and analyze long-horizon stability.
    Stability {
        #[command(subcommand)]
        command: commands::stability::StabilityCommands,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sov_interceptor=info".parse()?)
                .add_directive("sov_stability=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = EngineConfig::for_project(&project_root);
    tracing::debug!(root = %project_root.display(), "using project root");
    let json = cli.json;

    match &cli.command {
        Commands::Check {
            name,
            tool,
            dry_run,
        } => commands::check::execute(&config, name, *tool, *dry_run, json),
        Commands::Identity => commands::identity::execute(&config, json),
        Commands::Sovereignty { units, drift } => {
            commands::sovereignty::execute(&config, *units, *drift, json)
        }
        Commands::Registry { command } => commands::registry::execute(command, &config, json),
        Commands::Audit { command } => commands::audit::execute(command, &config, json),
        Commands::Heat { command } => commands::heat::execute(command, &config, json),
        Commands::Stability { command } => commands::stability::execute(command, &config, json),
    }
}
