use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{AiClient, ArtifactStore, SpeechRequest};
use crate::domain::{ArtifactCategory, SpeechRecord, timestamped_stem};
use crate::infrastructure::observability::sanitize_prompt;

use super::source_file::require_text;
use super::{RetryPolicy, ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechDefaults {
    pub model: String,
    pub voice: String,
}

pub struct SpeechSynthesisService {
    client: Arc<dyn AiClient>,
    store: Arc<dyn ArtifactStore>,
    retry: RetryPolicy,
    defaults: SpeechDefaults,
}

impl SpeechSynthesisService {
    pub fn new(
        client: Arc<dyn AiClient>,
        store: Arc<dyn ArtifactStore>,
        retry: RetryPolicy,
        defaults: SpeechDefaults,
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

    pub fn default_voice(&self) -> &str {
        &self.defaults.voice
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn text_to_speech(
        &self,
        text: &str,
        voice: Option<&str>,
        model: Option<&str>,
    ) -> Result<SpeechRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }
        let text = require_text(text, "text to speak")?;
        tracing::debug!(text = %sanitize_prompt(text), "Synthesizing speech");

        let voice = pick(voice, &self.defaults.voice);
        let model = pick(model, &self.defaults.model);

        let request = SpeechRequest {
            model: model.clone(),
            voice: voice.clone(),
            input: text.to_string(),
        };

        let client = &self.client;
        let request = &request;
        let audio = self
            .retry
            .execute("speech synthesis", move || client.synthesize_speech(request))
            .await?;

        if audio.is_empty() {
            return Err(ServiceError::InvalidResponse(
                "speech response contained no audio".to_string(),
            ));
        }

        let stem = timestamped_stem("tts", Utc::now());
        let path = self
            .store
            .persist(ArtifactCategory::Logs, &stem, "mp3", &audio)
            .await?;

        tracing::info!(path = %path.display(), bytes = audio.len(), "Speech saved");

        Ok(SpeechRecord { path, voice, model })
    }
}

fn pick(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
