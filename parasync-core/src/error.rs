//! Error types for parasync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`TranslationSource`](crate::TranslationSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The credential was missing or rejected (HTTP 401/403).
    #[error("authentication rejected (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// The project or file does not exist (HTTP 404).
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response or source file could not be decoded.
    #[error("failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// Local I/O while assembling content.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// All errors that can arise while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not supplied anywhere.
    #[error("missing required setting `{name}` (set {hint})")]
    Missing {
        name: &'static str,
        hint: &'static str,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
