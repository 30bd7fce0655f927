use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{
    AiClient, ArtifactStore, ChatMessage, ChatRequest, TranscriptionRequest,
};
use crate::domain::{
    ArtifactCategory, SUMMARY_SYSTEM_PROMPT, SummaryRecord, TranscriptRecord,
    render_summary_markdown, timestamped_stem,
};
use crate::infrastructure::observability::sanitize_prompt;

use super::source_file::{file_name_of, read_source_file, require_text};
use super::{RetryPolicy, ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionDefaults {
    pub transcription_model: String,
    pub summary_model: String,
    pub summary_temperature: f32,
    pub summary_max_tokens: u32,
}

/// Speech-to-text plus an optional summarization pass over the transcript.
pub struct TranscriptionService {
    client: Arc<dyn AiClient>,
    store: Arc<dyn ArtifactStore>,
    retry: RetryPolicy,
    defaults: TranscriptionDefaults,
}

impl TranscriptionService {
    pub fn new(
        client: Arc<dyn AiClient>,
        store: Arc<dyn ArtifactStore>,
        retry: RetryPolicy,
        defaults: TranscriptionDefaults,
    ) -> Self {
        Self {
            client,
            store,
            retry,
            defaults,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[tracing::instrument(skip(self))]
    pub async fn transcribe_audio(
        &self,
        file_path: &Path,
        translate: bool,
        language: Option<&str>,
    ) -> Result<TranscriptRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }

        let audio = read_source_file(file_path).await?;
        let request = TranscriptionRequest {
            model: self.defaults.transcription_model.clone(),
            audio,
            file_name: file_name_of(file_path, "audio.mp3"),
            language: language
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            translate,
        };

        let operation = if translate {
            "audio translation"
        } else {
            "audio transcription"
        };
        let client = &self.client;
        let request = &request;
        let transcript = self
            .retry
            .execute(operation, move || client.transcribe(request))
            .await?;

        let stem = timestamped_stem("transcript", Utc::now());
        let path = self
            .store
            .persist(
                ArtifactCategory::Transcripts,
                &stem,
                "txt",
                transcript.as_bytes(),
            )
            .await?;

        tracing::info!(path = %path.display(), chars = transcript.len(), "Transcript saved");

        Ok(TranscriptRecord {
            path,
            text: transcript,
            translated: translate,
        })
    }

    /// Summarizes `text` and writes the summary as Markdown under `logs/`.
    #[tracing::instrument(skip(self, text))]
    pub async fn summarize_text(
        &self,
        text: &str,
        model: Option<&str>,
    ) -> Result<SummaryRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }
        let text = require_text(text, "text to summarize")?;
        tracing::debug!(text = %sanitize_prompt(text), "Summarizing text");

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.defaults.summary_model)
            .to_string();

        let request = ChatRequest {
            model: model.clone(),
            messages: vec![
                ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
                ChatMessage::user(text),
            ],
            temperature: self.defaults.summary_temperature,
            max_tokens: self.defaults.summary_max_tokens,
            json_response: false,
        };

        let client = &self.client;
        let request = &request;
        let completion = self
            .retry
            .execute("summarization", move || client.chat_completion(request))
            .await?;

        let summary = completion.content.trim().to_string();
        let stem = timestamped_stem("summary", Utc::now());
        let path = self
            .store
            .persist(
                ArtifactCategory::Logs,
                &stem,
                "md",
                render_summary_markdown(&summary).as_bytes(),
            )
            .await?;

        tracing::info!(path = %path.display(), model = %model, "Summary saved");

        Ok(SummaryRecord {
            path,
            summary,
            model,
        })
    }
}
