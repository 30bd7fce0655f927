use std::path::PathBuf;

use crate::application::ports::{AiClientError, ArtifactStoreError};

pub(crate) const MISSING_CREDENTIAL: &str =
    "OpenAI API key is not configured. Set OPENAI_API_KEY env variable.";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    RequestFailed {
        operation: String,
        attempts: u32,
        #[source]
        source: AiClientError,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("storage: {0}")]
    Storage(#[from] ArtifactStoreError),
}

impl ServiceError {
    pub(crate) fn unconfigured() -> Self {
        ServiceError::Configuration(MISSING_CREDENTIAL.to_string())
    }
}
