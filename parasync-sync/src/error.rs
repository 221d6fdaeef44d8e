//! Error types for parasync-sync.

use std::path::PathBuf;

use thiserror::Error;

use parasync_core::SourceError;

/// All errors that can arise from a sync run. Every variant is fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing or fetching from the translation source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the output directory failed.
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// A remote path that is absolute, empty or climbs out of the output root.
    #[error("refusing to write outside the output root: {path}")]
    InvalidPath { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
