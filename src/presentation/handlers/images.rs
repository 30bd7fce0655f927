use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactCategory, ImageBatchRecord, ImageRecord, ImageStyle};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::ApiError;

#[derive(Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub style: Option<ImageStyle>,
    #[serde(default)]
    pub n: Option<u8>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum GenerateImageResponse {
    Single(ImageRecord),
    Batch(ImageBatchRecord),
}

/// Source and mask are file names of previously generated images.
#[derive(Deserialize)]
pub struct EditImageRequest {
    pub image: String,
    pub prompt: String,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

#[tracing::instrument(skip(state, request))]
pub async fn generate_image_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, ApiError> {
    tracing::debug!(prompt = %sanitize_prompt(&request.prompt), n = ?request.n, "Generating image");

    let size = request.size.as_deref();
    let response = match request.n {
        Some(n) if n != 1 => GenerateImageResponse::Batch(
            state
                .image_service
                .generate_images(&request.prompt, size, request.style, n)
                .await?,
        ),
        _ => GenerateImageResponse::Single(
            state
                .image_service
                .generate_image(&request.prompt, size, request.style)
                .await?,
        ),
    };

    Ok(Json(response))
}

#[tracing::instrument(skip(state, request))]
pub async fn edit_image_handler(
    State(state): State<AppState>,
    Json(request): Json<EditImageRequest>,
) -> Result<Json<ImageRecord>, ApiError> {
    let image_path = state
        .artifact_store
        .resolve(ArtifactCategory::Images, &request.image)
        .await?;
    let mask_path = match &request.mask {
        Some(mask) => Some(
            state
                .artifact_store
                .resolve(ArtifactCategory::Images, mask)
                .await?,
        ),
        None => None,
    };

    let record = state
        .image_service
        .edit_image(
            &image_path,
            &request.prompt,
            mask_path.as_deref(),
            request.size.as_deref(),
        )
        .await?;

    Ok(Json(record))
}
