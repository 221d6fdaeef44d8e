//! `parasync sync` — fetch translations and write changed files.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use parasync_sync::{pipeline, SyncReport, WriteResult};

use super::ConfigArgs;

/// Arguments for `parasync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let report = pipeline::sync_project(&config, self.dry_run)
            .with_context(|| format!("sync failed for project {}", config.project_id))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

pub(crate) fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let changed = report.changed().len();
    let unchanged = report.unchanged_count();

    if changed == 0 {
        println!(
            "{prefix}{} nothing changed ({unchanged} unchanged)",
            "✓".green()
        );
    } else {
        println!(
            "{prefix}{} {changed} changed, {unchanged} unchanged",
            "✓".green()
        );
    }

    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
}
