//! `parasync check` — full-width punctuation pass over the output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use parasync_sync::punctuation;

use super::{load_config_file, sync::print_report};

/// Arguments for `parasync check`. Needs no project or token.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// YAML config file (defaults to ./parasync.yaml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory whose `.json` files are checked.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report the files that would change without rewriting them.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let file = load_config_file(self.config.as_deref())?;
        let output_dir = file.output_dir_or(self.output_dir);
        let report = punctuation::check(&output_dir, self.dry_run)
            .with_context(|| format!("punctuation check failed in {}", output_dir.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}
