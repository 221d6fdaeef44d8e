//! parasync — pull Paratranz translations into a local resource pack.
//!
//! # Usage
//!
//! ```text
//! parasync sync [--dry-run] [--json] [--project-id <id>] [--output-dir <dir>] ...
//! parasync diff [--project-id <id>] [--output-dir <dir>] ...
//! parasync check [--dry-run] [--json] [--output-dir <dir>]
//! ```
//!
//! `PROJECT_ID` and `API_TOKEN` are read from the environment when the
//! matching flags are absent.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "parasync",
    version,
    about = "Sync Paratranz translations into a local output directory",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch translations and write every file that changed.
    Sync(SyncArgs),

    /// Show unified diff of what sync would write.
    Diff(DiffArgs),

    /// Convert ASCII punctuation in the output's JSON values to full width.
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
