//! The seam between the synchronizer and wherever translations come from.

use crate::error::SourceError;
use crate::types::RemoteFile;

/// A remote project that can list its translation files and produce the
/// text content of each one.
///
/// Content is opaque to callers: the synchronizer only compares and writes
/// it byte for byte.
pub trait TranslationSource {
    /// Every file the project currently exposes.
    fn list_files(&self) -> Result<Vec<RemoteFile>, SourceError>;

    /// Current content for one listed file.
    fn fetch_content(&self, file: &RemoteFile) -> Result<String, SourceError>;
}

impl<T: TranslationSource + ?Sized> TranslationSource for &T {
    fn list_files(&self) -> Result<Vec<RemoteFile>, SourceError> {
        (**self).list_files()
    }

    fn fetch_content(&self, file: &RemoteFile) -> Result<String, SourceError> {
        (**self).fetch_content(file)
    }
}
