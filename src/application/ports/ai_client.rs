use async_trait::async_trait;

use crate::domain::{ImageStyle, TokenUsage};

/// Capability surface of the remote generative AI service.
///
/// `is_configured` reports whether a credential is available; callers check
/// it before issuing any operation.
#[async_trait]
pub trait AiClient: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn chat_completion(&self, request: &ChatRequest)
    -> Result<ChatCompletion, AiClientError>;

    /// Returns one base64-encoded PNG per generated image.
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<String>, AiClientError>;

    /// Returns one base64-encoded PNG per edited image.
    async fn edit_image(&self, request: &ImageEditRequest) -> Result<Vec<String>, AiClientError>;

    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, AiClientError>;

    /// Returns the raw encoded audio bytes.
    async fn synthesize_speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, AiClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("api request failed: HTTP {status}: {body}")]
    ApiRequestFailed { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl AiClientError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AiClientError::RateLimited)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_response: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub style: Option<ImageStyle>,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageEditRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub image: Vec<u8>,
    pub image_name: String,
    pub mask: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub model: String,
    pub audio: Vec<u8>,
    pub file_name: String,
    pub language: Option<String>,
    /// Translate the speech to English instead of transcribing verbatim.
    pub translate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
}
