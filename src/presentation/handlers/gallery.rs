use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::ports::ArtifactStoreError;
use crate::application::services::{DEFAULT_RECENT_LIMIT, GallerySection};
use crate::domain::ArtifactCategory;
use crate::presentation::state::AppState;

use super::ApiError;

#[derive(Deserialize)]
pub struct GalleryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn gallery_handler(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<GallerySection>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let sections = state.gallery_service.sections(limit).await?;
    Ok(Json(sections))
}

/// Streams a persisted artifact back as a download.
pub async fn artifact_download_handler(
    State(state): State<AppState>,
    Path((category, file_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let category =
        ArtifactCategory::from_dir_name(&category).map_err(ArtifactStoreError::from)?;
    let path = state.artifact_store.resolve(category, &file_name).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::from(ArtifactStoreError::Io(e)))?;

    let disposition = format!("attachment; filename=\"{}\"", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&file_name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "md" => "text/markdown; charset=utf-8",
        "txt" | "log" => "text/plain; charset=utf-8",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
