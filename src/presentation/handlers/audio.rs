use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::application::services::ServiceError;
use crate::domain::{
    ArtifactCategory, SpeechRecord, SummaryRecord, TranscriptRecord, timestamped_stem,
};
use crate::presentation::state::AppState;

use super::ApiError;

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub transcript: TranscriptRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
    /// Set when the transcript was saved but summarizing it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

#[derive(Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Deserialize)]
pub struct SpeechRequestBody {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Default)]
struct TranscriptionForm {
    audio: Option<(String, Vec<u8>)>,
    translate: bool,
    summarize: bool,
    language: Option<String>,
}

/// Accepts a multipart upload (`file`, optional `translate`, `language`,
/// `summarize`), keeps the upload under `logs/` and transcribes it.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcription_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    if !state.transcription_service.is_configured() {
        return Err(ServiceError::unconfigured().into());
    }

    let form = read_transcription_form(multipart).await?;
    let (file_name, audio) = form
        .audio
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let upload_name = Path::new(&file_name);
    let stem = upload_name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let extension = upload_name
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp3");

    let upload_path = state
        .artifact_store
        .persist(
            ArtifactCategory::Logs,
            &timestamped_stem(&format!("upload-{}", stem), Utc::now()),
            extension,
            &audio,
        )
        .await?;

    tracing::debug!(path = %upload_path.display(), bytes = audio.len(), "Upload stored");

    let transcript = state
        .transcription_service
        .transcribe_audio(&upload_path, form.translate, form.language.as_deref())
        .await?;

    let mut summary = None;
    let mut summary_error = None;
    if form.summarize && !transcript.text.trim().is_empty() {
        match state
            .transcription_service
            .summarize_text(&transcript.text, None)
            .await
        {
            Ok(record) => summary = Some(record),
            Err(e) => {
                tracing::warn!(
                    transcript = %transcript.path.display(),
                    error = %e,
                    "Summary failed, returning transcript only"
                );
                summary_error = Some(e.to_string());
            }
        }
    }

    Ok(Json(TranscriptionResponse {
        transcript,
        summary,
        summary_error,
    }))
}

async fn read_transcription_form(mut multipart: Multipart) -> Result<TranscriptionForm, ApiError> {
    let mut form = TranscriptionForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError::bad_request(format!(
                    "Failed to read multipart: {}",
                    e
                )));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("audio.mp3").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read upload: {}", e))
                })?;
                form.audio = Some((file_name, bytes.to_vec()));
            }
            "translate" | "summarize" | "language" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field {}: {}", name, e))
                })?;
                match name.as_str() {
                    "translate" => form.translate = is_truthy(&value),
                    "summarize" => form.summarize = is_truthy(&value),
                    _ => {
                        form.language = Some(value.trim().to_string()).filter(|v| !v.is_empty())
                    }
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[tracing::instrument(skip(state, request))]
pub async fn summary_handler(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryRecord>, ApiError> {
    let record = state
        .transcription_service
        .summarize_text(&request.text, request.model.as_deref())
        .await?;
    Ok(Json(record))
}

#[tracing::instrument(skip(state, request))]
pub async fn speech_handler(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequestBody>,
) -> Result<Json<SpeechRecord>, ApiError> {
    let record = state
        .speech_service
        .text_to_speech(
            &request.text,
            request.voice.as_deref(),
            request.model.as_deref(),
        )
        .await?;
    Ok(Json(record))
}
