use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ArtifactCategory, MediaKind, UnknownCategory};

/// Flat-file persistence for adapter outputs.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `contents` to `<category dir>/<safe stem>.<extension>` and returns
    /// the path written.
    async fn persist(
        &self,
        category: ArtifactCategory,
        stem: &str,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf, ArtifactStoreError>;

    /// Lists regular files under a category, newest first.
    async fn list(&self, category: ArtifactCategory)
    -> Result<Vec<ArtifactEntry>, ArtifactStoreError>;

    /// Maps a plain file name inside a category to an existing path.
    async fn resolve(
        &self,
        category: ArtifactCategory,
        file_name: &str,
    ) -> Result<PathBuf, ArtifactStoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub kind: MediaKind,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
}
