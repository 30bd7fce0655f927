use std::io;
use std::path::Path;

use crate::application::ports::ArtifactStoreError;

use super::ServiceError;

/// Reads a user-supplied input file, mapping absence to [`ServiceError::NotFound`].
pub(crate) async fn read_source_file(path: &Path) -> Result<Vec<u8>, ServiceError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ServiceError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(ServiceError::Storage(ArtifactStoreError::Io(e))),
    }
}

pub(crate) fn file_name_of(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) fn require_text<'a>(text: &'a str, what: &str) -> Result<&'a str, ServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(trimmed)
}
