//! # cerp CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cerp_cli::milestone::{run_advance, run_evidence, AdvanceArgs, EvidenceArgs};
use cerp_cli::skeleton::{run_skeleton, SkeletonArgs};
use cerp_cli::status::{run_status, StatusArgs};
use cerp_cli::validate::{run_validate, ValidateArgs};

/// Contract ERP CLI.
///
/// Validates contract snapshots, applies milestone evidence, advances
/// phases, and reports progress.
#[derive(Parser, Debug)]
#[command(name = "cerp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a contract snapshot for structural inconsistencies.
    Validate(ValidateArgs),

    /// Submit evidence for one action and advance phases.
    Evidence(EvidenceArgs),

    /// Advance the contract if its current phase is complete.
    Advance(AdvanceArgs),

    /// Show phases, actions, and completion.
    Status(StatusArgs),

    /// Print the fallback contract skeleton.
    Skeleton(SkeletonArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Evidence(args) => run_evidence(args),
        Commands::Advance(args) => run_advance(args),
        Commands::Status(args) => run_status(args),
        Commands::Skeleton(args) => run_skeleton(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
