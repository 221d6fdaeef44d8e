//! Atomic writer and the sync run itself.
//!
//! ## Sync run
//!
//! 1. List remote files.
//! 2. Fetch every file's content (nothing is written if any fetch fails).
//! 3. Resolve each relative path under the output root.
//! 4. Compare with the bytes on disk, skip if identical.
//! 5. Write to `<path>.parasync.tmp`, then rename over the final path.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use parasync_core::{RemoteFile, TranslationSource};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write. Paths are relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: the bytes on disk already match.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Summary of one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub writes: Vec<WriteResult>,
}

impl SyncReport {
    /// Relative paths created or overwritten (or that would be, in dry-run).
    pub fn changed(&self) -> BTreeSet<PathBuf> {
        self.writes
            .iter()
            .filter(|w| w.is_change())
            .map(|w| w.path().to_path_buf())
            .collect()
    }

    pub fn unchanged_count(&self) -> usize {
        self.writes.iter().filter(|w| !w.is_change()).count()
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Write `content` to `path` unless the file already holds exactly those bytes.
///
/// `relative` is only used to label the result.
pub(crate) fn atomic_write(
    path: &Path,
    relative: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.parasync.tmp", path.display()));
    atomic_write_with_tmp(path, relative, content, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    relative: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    let relative = relative.to_path_buf();

    if read_existing(path)?.as_deref() == Some(content.as_bytes()) {
        tracing::debug!("unchanged: {}", relative.display());
        return Ok(WriteResult::Unchanged { path: relative });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", relative.display());
        return Ok(WriteResult::WouldWrite { path: relative });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        if let Err(cleanup) = std::fs::remove_file(tmp) {
            tracing::debug!("could not remove {}: {cleanup}", tmp.display());
        }
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", relative.display());
    Ok(WriteResult::Written { path: relative })
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// Fetch phase
// ---------------------------------------------------------------------------

/// A remote file with its fetched content and resolved local target.
#[derive(Debug, Clone)]
pub(crate) struct FetchedFile {
    pub file: RemoteFile,
    pub target: PathBuf,
    pub content: String,
}

/// Join `relative` onto `root`, rejecting anything that could land outside it.
pub(crate) fn resolve_target(root: &Path, relative: &Path) -> Result<PathBuf, SyncError> {
    let mut has_name = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            _ => {
                return Err(SyncError::InvalidPath {
                    path: relative.to_path_buf(),
                })
            }
        }
    }
    if !has_name {
        return Err(SyncError::InvalidPath {
            path: relative.to_path_buf(),
        });
    }
    Ok(root.join(relative))
}

/// List and fetch everything up front so a failure leaves the disk untouched.
pub(crate) fn fetch_all<S: TranslationSource + ?Sized>(
    source: &S,
    output_root: &Path,
) -> Result<Vec<FetchedFile>, SyncError> {
    let files = source.list_files()?;
    tracing::info!("{} remote file(s) listed", files.len());

    // One entry per local path; a later listing replaces an earlier one in place.
    let mut unique: Vec<RemoteFile> = Vec::with_capacity(files.len());
    for file in files {
        match unique.iter_mut().find(|u| u.path == file.path) {
            Some(existing) => {
                tracing::warn!(
                    "{} and {} both map to {}; using {}",
                    existing.name,
                    file.name,
                    file.path.display(),
                    file.name
                );
                *existing = file;
            }
            None => unique.push(file),
        }
    }

    let mut fetched = Vec::with_capacity(unique.len());
    for file in unique {
        let target = resolve_target(output_root, &file.path)?;
        let content = source.fetch_content(&file)?;
        tracing::debug!("fetched {} ({} bytes)", file.name, content.len());
        fetched.push(FetchedFile {
            file,
            target,
            content,
        });
    }
    Ok(fetched)
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

/// Reconcile `output_root` with the remote project behind `source`.
///
/// Files with no remote counterpart are left alone.
pub fn sync<S: TranslationSource + ?Sized>(
    source: &S,
    output_root: &Path,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    let started_at = Utc::now();
    let fetched = fetch_all(source, output_root)?;

    let mut writes = Vec::with_capacity(fetched.len());
    for f in &fetched {
        writes.push(atomic_write(&f.target, &f.file.path, &f.content, dry_run)?);
    }

    let report = SyncReport {
        started_at,
        finished_at: Utc::now(),
        dry_run,
        writes,
    };
    tracing::info!(
        "sync finished: {} changed, {} unchanged",
        report.changed().len(),
        report.unchanged_count()
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
