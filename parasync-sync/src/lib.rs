//! # parasync-sync
//!
//! Compare-then-atomic-write synchronizer.
//!
//! Call [`sync`] with any [`TranslationSource`](parasync_core::TranslationSource)
//! to reconcile an output directory, or [`pipeline::sync_project`] to do the
//! same against the Paratranz project named in a [`SyncConfig`](parasync_core::SyncConfig).
//! [`punctuation::check`] normalizes the punctuation of files already on disk.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod punctuation;
pub mod writer;

pub use diff::{diff, FileDiff};
pub use error::SyncError;
pub use writer::{sync, SyncReport, WriteResult};
