//! Dry-run unified diff support for `parasync diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use parasync_core::TranslationSource;

use crate::{error::io_err, writer::fetch_all, SyncError};

/// A single file diff. `path` is relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Fetch what `sync` would write and compare it to current on-disk content.
///
/// No files are written.
pub fn diff<S: TranslationSource + ?Sized>(
    source: &S,
    output_root: &Path,
) -> Result<Vec<FileDiff>, SyncError> {
    let mut diffs = Vec::new();
    for fetched in fetch_all(source, output_root)? {
        let existing = read_existing_or_empty(&fetched.target)?;
        if existing == fetched.content {
            continue;
        }

        let relative = fetched.file.path;
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &fetched.content)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: relative,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
