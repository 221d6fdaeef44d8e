//! `parasync diff` — show unified diffs for what sync would write.

use anyhow::{Context, Result};
use clap::Args;

use parasync_sync::pipeline;

use super::ConfigArgs;

/// Arguments for `parasync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let diffs = pipeline::diff_project(&config)
            .with_context(|| format!("diff failed for project {}", config.project_id))?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
