pub mod check;
pub mod diff;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use parasync_core::{config, ConfigFile, Overrides, SyncConfig};

/// Settings shared by every subcommand. Flags win over the config file.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// YAML config file (defaults to ./parasync.yaml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Paratranz project id.
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Paratranz API token.
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Directory the localized files are written to.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Checkout of the untranslated files, used to keep key order.
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// API root, e.g. https://paratranz.cn/api.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Extra attempts for transient network or server errors.
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<SyncConfig> {
        let file = load_config_file(self.config.as_deref())?;
        let overrides = Overrides {
            project_id: self.project_id.clone(),
            api_token: self.api_token.clone(),
            output_dir: self.output_dir.clone(),
            source_dir: self.source_dir.clone(),
            base_url: self.base_url.clone(),
            max_retries: self.max_retries,
        };
        Ok(SyncConfig::resolve(file, overrides)?)
    }
}

/// The explicit `--config` file, or `./parasync.yaml` when present.
pub(crate) fn load_config_file(path: Option<&Path>) -> Result<ConfigFile> {
    Ok(match path {
        Some(path) => config::load_file_at(path)?,
        None => {
            let cwd = std::env::current_dir().context("could not determine working directory")?;
            config::load_default_at(&cwd)?
        }
    })
}
