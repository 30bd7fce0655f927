use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{
    AiClient, AiClientError, ChatCompletion, ChatRequest, ImageEditRequest,
    ImageGenerationRequest, SpeechRequest, TranscriptionRequest,
};

const DEFAULT_CHAT_REPLY: &str = r#"{"summary": "Mock plan", "meals": {}, "shopping_list": []}"#;
// 1x1 transparent PNG
const DEFAULT_IMAGE_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Scripted `AiClient` for tests and offline runs.
///
/// Queued errors are returned first, in order; once a queue is drained the
/// canned success value is returned. Chat errors are only consumed by chat
/// completions. Every remote operation increments [`MockAiClient::call_count`].
pub struct MockAiClient {
    configured: bool,
    chat_reply: String,
    image_payload: String,
    transcript: String,
    speech_audio: Vec<u8>,
    queued_errors: Mutex<VecDeque<AiClientError>>,
    chat_errors: Mutex<VecDeque<AiClientError>>,
    calls: AtomicUsize,
    last_chat_request: Mutex<Option<ChatRequest>>,
    last_image_request: Mutex<Option<ImageGenerationRequest>>,
}

impl Default for MockAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiClient {
    pub fn new() -> Self {
        Self {
            configured: true,
            chat_reply: DEFAULT_CHAT_REPLY.to_string(),
            image_payload: DEFAULT_IMAGE_B64.to_string(),
            transcript: "Mock transcript".to_string(),
            speech_audio: b"ID3mock-audio".to_vec(),
            queued_errors: Mutex::new(VecDeque::new()),
            chat_errors: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_chat_request: Mutex::new(None),
            last_image_request: Mutex::new(None),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_chat_reply(mut self, reply: impl Into<String>) -> Self {
        self.chat_reply = reply.into();
        self
    }

    pub fn with_image_payload(mut self, base64_png: impl Into<String>) -> Self {
        self.image_payload = base64_png.into();
        self
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    pub fn with_speech_audio(mut self, audio: impl Into<Vec<u8>>) -> Self {
        self.speech_audio = audio.into();
        self
    }

    pub fn with_error(self, error: AiClientError) -> Self {
        self.queued_errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(error);
        self
    }

    pub fn with_chat_error(self, error: AiClientError) -> Self {
        self.chat_errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(error);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_chat_request(&self) -> Option<ChatRequest> {
        self.last_chat_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last_image_request(&self) -> Option<ImageGenerationRequest> {
        self.last_image_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record_call(&self) -> Result<(), AiClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .queued_errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl AiClient for MockAiClient {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, AiClientError> {
        *self
            .last_chat_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());
        self.record_call()?;
        if let Some(error) = self
            .chat_errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
        {
            return Err(error);
        }
        Ok(ChatCompletion {
            content: self.chat_reply.clone(),
            usage: None,
        })
    }

    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<String>, AiClientError> {
        *self
            .last_image_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());
        self.record_call()?;
        Ok(vec![self.image_payload.clone(); usize::from(request.count)])
    }

    async fn edit_image(&self, _request: &ImageEditRequest) -> Result<Vec<String>, AiClientError> {
        self.record_call()?;
        Ok(vec![self.image_payload.clone()])
    }

    async fn transcribe(&self, _request: &TranscriptionRequest) -> Result<String, AiClientError> {
        self.record_call()?;
        Ok(self.transcript.clone())
    }

    async fn synthesize_speech(
        &self,
        _request: &SpeechRequest,
    ) -> Result<Vec<u8>, AiClientError> {
        self.record_call()?;
        Ok(self.speech_audio.clone())
    }
}
