use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::application::ports::{ArtifactEntry, ArtifactStore, ArtifactStoreError};
use crate::domain::{ArtifactCategory, DEFAULT_MAX_LENGTH, safe_filename};

use super::artifact_path::build_artifact_path;

/// Artifact store rooted at a local data directory with one subdirectory per
/// [`ArtifactCategory`].
pub struct LocalArtifactStore {
    data_root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Result<Self, ArtifactStoreError> {
        let store = Self {
            data_root: data_root.into(),
        };
        store.ensure_data_directories()?;
        Ok(store)
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn directory(&self, category: ArtifactCategory) -> PathBuf {
        self.data_root.join(category.dir_name())
    }

    /// Creates every category directory that does not exist yet.
    pub fn ensure_data_directories(&self) -> Result<(), ArtifactStoreError> {
        for category in ArtifactCategory::ALL {
            std::fs::create_dir_all(self.directory(category))?;
        }
        Ok(())
    }

    pub fn build_artifact_path(
        &self,
        category: ArtifactCategory,
        stem: &str,
        extension: &str,
    ) -> Result<PathBuf, ArtifactStoreError> {
        self.ensure_data_directories()?;
        Ok(build_artifact_path(
            &self.directory(category),
            stem,
            extension,
        )?)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn persist(
        &self,
        category: ArtifactCategory,
        stem: &str,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf, ArtifactStoreError> {
        for dir_category in ArtifactCategory::ALL {
            tokio::fs::create_dir_all(self.directory(dir_category)).await?;
        }
        let path = self
            .directory(category)
            .join(safe_filename(stem, Some(extension), DEFAULT_MAX_LENGTH));
        tokio::fs::write(&path, contents).await?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Artifact written");
        Ok(path)
    }

    async fn list(
        &self,
        category: ArtifactCategory,
    ) -> Result<Vec<ArtifactEntry>, ArtifactStoreError> {
        let root = self.directory(category);
        let mut entries = Vec::new();
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            let mut read_dir = match tokio::fs::read_dir(&dir).await {
                Ok(rd) => rd,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(item) = read_dir.next_entry().await? {
                let metadata = item.metadata().await?;
                let path = item.path();
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !metadata.is_file() {
                    continue;
                }

                let extension = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_string();
                let modified = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());

                entries.push(ArtifactEntry {
                    file_name: item.file_name().to_string_lossy().into_owned(),
                    size_bytes: metadata.len(),
                    modified,
                    kind: category.media_kind(&extension),
                    path,
                });
            }
        }

        entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(entries)
    }

    async fn resolve(
        &self,
        category: ArtifactCategory,
        file_name: &str,
    ) -> Result<PathBuf, ArtifactStoreError> {
        let is_plain_name = !file_name.is_empty()
            && !file_name.starts_with('.')
            && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_plain_name {
            return Err(ArtifactStoreError::InvalidFileName(file_name.to_string()));
        }

        let path = self.directory(category).join(file_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(ArtifactStoreError::NotFound(file_name.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ArtifactStoreError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
