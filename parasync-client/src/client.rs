//! Blocking Paratranz REST client.

use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use parasync_core::{
    ApiToken, FileId, ProjectId, RemoteFile, SourceError, SyncConfig, TranslationEntry,
    TranslationSource,
};

use crate::http::{classify, with_retry};
use crate::render;

/// A file as returned by `GET /projects/{id}/files`. Only the fields the
/// sync needs are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    pub id: u64,
    pub name: String,
}

/// Paratranz project client; implements [`TranslationSource`].
pub struct ParatranzClient {
    agent: ureq::Agent,
    base_url: String,
    project_id: ProjectId,
    token: ApiToken,
    max_retries: u32,
    retry_delay: Duration,
    source_dir: PathBuf,
    skip_patterns: Vec<String>,
}

impl ParatranzClient {
    pub fn new(config: &SyncConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            base_url: config.base_url.clone(),
            project_id: config.project_id.clone(),
            token: config.api_token.clone(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
            source_dir: config.source_dir.clone(),
            skip_patterns: config.skip_patterns.clone(),
        }
    }

    /// Raw file listing, before skip patterns are applied.
    pub fn list_remote_files(&self) -> Result<Vec<FileInfo>, SourceError> {
        let url = format!("{}/projects/{}/files", self.base_url, self.project_id);
        self.get_json(&url, &format!("project {}", self.project_id))
    }

    /// Every entry of one file, in the order the service returns them.
    pub fn fetch_entries(&self, file_id: FileId) -> Result<Vec<TranslationEntry>, SourceError> {
        let url = format!(
            "{}/projects/{}/files/{}/translation",
            self.base_url, self.project_id, file_id
        );
        self.get_json(
            &url,
            &format!("file {file_id} in project {}", self.project_id),
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, SourceError> {
        let body = with_retry(what, self.max_retries, self.retry_delay, || {
            tracing::debug!("GET {url}");
            self.agent
                .get(url)
                .set("Authorization", self.token.expose())
                .set("Accept", "*/*")
                .call()
                .map_err(|e| classify(e, what))?
                .into_string()
                .map_err(|e| SourceError::Network(e.to_string()))
        })?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            context: what.to_owned(),
            message: e.to_string(),
        })
    }
}

impl TranslationSource for ParatranzClient {
    fn list_files(&self) -> Result<Vec<RemoteFile>, SourceError> {
        let files = self
            .list_remote_files()?
            .into_iter()
            .filter(|f| {
                let skipped = render::is_skipped(&f.name, &self.skip_patterns);
                if skipped {
                    tracing::debug!("skipping {}", f.name);
                }
                !skipped
            })
            .map(|f| RemoteFile {
                id: FileId(f.id),
                path: render::local_path_for(&f.name),
                name: f.name,
            })
            .collect();
        Ok(files)
    }

    fn fetch_content(&self, file: &RemoteFile) -> Result<String, SourceError> {
        let entries = self.fetch_entries(file.id)?;
        tracing::debug!("{}: {} entries", file.name, entries.len());
        render::render_file(file, &entries, &self.source_dir)
    }
}
