//! Domain types shared by the client, the synchronizer and the CLI.
//!
//! Local paths are always `PathBuf` and always relative to the output root;
//! remote names stay `String` because they are whatever the service lists.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of a remote translation project.
///
/// Accepts either a string or a bare number when deserialized, since config
/// files tend to carry `project_id: 10086` unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawProjectId", into = "String")]
pub struct ProjectId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProjectId {
    Text(String),
    Number(u64),
}

impl From<RawProjectId> for ProjectId {
    fn from(raw: RawProjectId) -> Self {
        match raw {
            RawProjectId::Text(s) => Self(s),
            RawProjectId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Numeric identifier the service assigns to each translation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// API credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw secret, for use in request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One translation file as listed by the remote project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: FileId,
    /// Path as the service names it (e.g. `kubejs/assets/foo/lang/en_us.json`).
    pub name: String,
    /// Where the rendered content lands, relative to the output root.
    pub path: PathBuf,
}

/// A single key of a remote translation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub key: String,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub stage: i64,
}

impl TranslationEntry {
    /// Stages whose translation must not ship: hidden, untranslated, disputed.
    pub const FALLBACK_STAGES: [i64; 3] = [-1, 0, 2];

    /// The text to publish: the translation when it is usable, otherwise the
    /// original.
    pub fn chosen_text(&self) -> &str {
        let original = self.original.as_deref().unwrap_or_default();
        match self.translation.as_deref() {
            Some(t) if !t.is_empty() && !Self::FALLBACK_STAGES.contains(&self.stage) => t,
            _ => original,
        }
    }
}
