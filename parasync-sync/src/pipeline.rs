//! Shared entrypoints used by the CLI: build the Paratranz client from a
//! resolved config and run against the configured output directory.

use parasync_client::ParatranzClient;
use parasync_core::SyncConfig;

use crate::{diff, sync, FileDiff, SyncError, SyncReport};

/// Run a full sync for the project described by `config`.
pub fn sync_project(config: &SyncConfig, dry_run: bool) -> Result<SyncReport, SyncError> {
    tracing::info!(
        "syncing project {} into {}",
        config.project_id,
        config.output_dir.display()
    );
    let client = ParatranzClient::new(config);
    sync(&client, &config.output_dir, dry_run)
}

/// Diff the project described by `config` against the output directory.
pub fn diff_project(config: &SyncConfig) -> Result<Vec<FileDiff>, SyncError> {
    let client = ParatranzClient::new(config);
    diff(&client, &config.output_dir)
}
