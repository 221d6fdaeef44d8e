//! Configuration resolution.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. [`Overrides`] — CLI flags and the `PROJECT_ID` / `API_TOKEN`
//!    environment variables (wired up by the binary).
//! 2. [`ConfigFile`] — optional `parasync.yaml`.
//! 3. Built-in defaults.
//!
//! The API token is never read from the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ApiToken, ProjectId};

pub const DEFAULT_CONFIG_FILE: &str = "parasync.yaml";
pub const DEFAULT_BASE_URL: &str = "https://paratranz.cn/api";
pub const DEFAULT_OUTPUT_DIR: &str = "CNPack";
pub const DEFAULT_SOURCE_DIR: &str = "Source";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// On-disk YAML layer. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project_id: Option<ProjectId>,
    pub output_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub skip_patterns: Option<Vec<String>>,
}

impl ConfigFile {
    /// `flag`, else the file's `output_dir`, else [`DEFAULT_OUTPUT_DIR`].
    pub fn output_dir_or(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_id: Option<String>,
    pub api_token: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub max_retries: Option<u32>,
}

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub project_id: ProjectId,
    pub api_token: ApiToken,
    pub output_dir: PathBuf,
    pub source_dir: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub skip_patterns: Vec<String>,
}

impl SyncConfig {
    /// Merge the layers. Empty strings count as unset, matching how CI
    /// runners expose undefined secrets.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self, ConfigError> {
        let output_dir = file.output_dir_or(overrides.output_dir);
        let project_id = non_empty(overrides.project_id)
            .map(ProjectId::from)
            .or(file.project_id.filter(|p| !p.0.is_empty()))
            .ok_or(ConfigError::Missing {
                name: "project_id",
                hint: "--project-id, PROJECT_ID or project_id in the config file",
            })?;
        let api_token = non_empty(overrides.api_token)
            .map(ApiToken::new)
            .ok_or(ConfigError::Missing {
                name: "api_token",
                hint: "--api-token or API_TOKEN",
            })?;

        Ok(Self {
            project_id,
            api_token,
            output_dir,
            source_dir: overrides
                .source_dir
                .or(file.source_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            base_url: non_empty(overrides.base_url)
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            max_retries: overrides
                .max_retries
                .or(file.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay: Duration::from_millis(
                file.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
            skip_patterns: file.skip_patterns.unwrap_or_else(|| vec!["TM".to_owned()]),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a config file that must exist.
pub fn load_file_at(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `<dir>/parasync.yaml` if present, otherwise an empty layer.
pub fn load_default_at(dir: &Path) -> Result<ConfigFile, ConfigError> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    load_file_at(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> Overrides {
        Overrides {
            project_id: Some("4242".into()),
            api_token: Some("token".into()),
            ..Overrides::default()
        }
    }

    #[test]
    fn defaults_apply_when_layers_are_empty() {
        let cfg = SyncConfig::resolve(ConfigFile::default(), with_credentials()).unwrap();
        assert_eq!(cfg.project_id, ProjectId::from("4242"));
        assert_eq!(cfg.output_dir, PathBuf::from("CNPack"));
        assert_eq!(cfg.source_dir, PathBuf::from("Source"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.skip_patterns, vec!["TM".to_string()]);
    }

    #[test]
    fn overrides_beat_file() {
        let file = ConfigFile {
            project_id: Some(ProjectId::from("1")),
            output_dir: Some(PathBuf::from("from-file")),
            max_retries: Some(7),
            ..ConfigFile::default()
        };
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("from-flag")),
            ..with_credentials()
        };
        let cfg = SyncConfig::resolve(file, overrides).unwrap();
        assert_eq!(cfg.project_id, ProjectId::from("4242"));
        assert_eq!(cfg.output_dir, PathBuf::from("from-flag"));
        assert_eq!(cfg.max_retries, 7);
    }

    #[test]
    fn output_dir_needs_no_credentials() {
        let file = ConfigFile {
            output_dir: Some(PathBuf::from("from-file")),
            ..ConfigFile::default()
        };
        assert_eq!(file.output_dir_or(None), PathBuf::from("from-file"));
        assert_eq!(
            file.output_dir_or(Some(PathBuf::from("flag"))),
            PathBuf::from("flag")
        );
        assert_eq!(
            ConfigFile::default().output_dir_or(None),
            PathBuf::from(DEFAULT_OUTPUT_DIR)
        );
    }

    #[test]
    fn project_id_can_come_from_file() {
        let file = ConfigFile {
            project_id: Some(ProjectId::from("77")),
            ..ConfigFile::default()
        };
        let overrides = Overrides {
            api_token: Some("token".into()),
            ..Overrides::default()
        };
        let cfg = SyncConfig::resolve(file, overrides).unwrap();
        assert_eq!(cfg.project_id.0, "77");
    }

    #[test]
    fn empty_token_is_missing() {
        let overrides = Overrides {
            api_token: Some("  ".into()),
            ..with_credentials()
        };
        let err = SyncConfig::resolve(ConfigFile::default(), overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "api_token", .. }));
    }

    #[test]
    fn missing_project_id_is_reported() {
        let overrides = Overrides {
            api_token: Some("token".into()),
            ..Overrides::default()
        };
        let err = SyncConfig::resolve(ConfigFile::default(), overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "project_id", .. }));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let overrides = Overrides {
            base_url: Some("http://127.0.0.1:9000/api/".into()),
            ..with_credentials()
        };
        let cfg = SyncConfig::resolve(ConfigFile::default(), overrides).unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:9000/api");
    }
}
