use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::ArtifactStoreError;
use crate::application::services::ServiceError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Service failure rendered as a JSON error body.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        let status = match &error {
            ServiceError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::RequestFailed { .. } | ServiceError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            ServiceError::Storage(inner) => return ApiError::from_store(inner),
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl From<ArtifactStoreError> for ApiError {
    fn from(error: ArtifactStoreError) -> Self {
        ApiError::from_store(&error)
    }
}

impl ApiError {
    fn from_store(error: &ArtifactStoreError) -> Self {
        let status = match error {
            ArtifactStoreError::NotFound(_) | ArtifactStoreError::UnknownCategory(_) => {
                StatusCode::NOT_FOUND
            }
            ArtifactStoreError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            ArtifactStoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
