//! parasync core library — domain types, the translation source seam,
//! configuration and errors.
//!
//! - [`types`] — newtypes and domain structs
//! - [`source`] — [`TranslationSource`]
//! - [`config`] — layered [`SyncConfig`] resolution
//! - [`error`] — [`SourceError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::{ConfigFile, Overrides, SyncConfig};
pub use error::{ConfigError, SourceError};
pub use source::TranslationSource;
pub use types::{ApiToken, FileId, ProjectId, RemoteFile, TranslationEntry};
