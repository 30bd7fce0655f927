use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    AiClient, AiClientError, ChatCompletion, ChatRequest, ImageEditRequest,
    ImageGenerationRequest, SpeechRequest, TranscriptionRequest,
};
use crate::domain::TokenUsage;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// `AiClient` backed by the OpenAI REST API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessageBody<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessageBody<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'static str>,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AiClientError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| AiClientError::Transport(format!("client: {}", e)))?;

        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, AiClientError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response).await
    }

    fn image_part(bytes: Vec<u8>, file_name: String) -> Result<multipart::Part, AiClientError> {
        multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|e| AiClientError::Transport(format!("mime: {}", e)))
    }

    fn decode_images(response: ImageResponse) -> Result<Vec<String>, AiClientError> {
        let payloads = response
            .data
            .into_iter()
            .map(|d| {
                d.b64_json.ok_or_else(|| {
                    AiClientError::InvalidResponse("image entry without b64_json".to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if payloads.is_empty() {
            return Err(AiClientError::InvalidResponse(
                "empty image data".to_string(),
            ));
        }
        Ok(payloads)
    }
}

fn map_transport_error(e: reqwest::Error) -> AiClientError {
    if e.is_timeout() {
        AiClientError::Timeout
    } else {
        AiClientError::Transport(e.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, AiClientError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AiClientError::RateLimited);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AiClientError::ApiRequestFailed {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AiClientError> {
    let bytes = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| AiClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl AiClient for OpenAiClient {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, AiClientError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessageBody {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .send(self.client.post(self.url("chat/completions")).json(&body))
            .await?;
        let parsed: ChatCompletionResponse = parse_json(response).await?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(ChatCompletion {
            content,
            usage: parsed.usage,
        })
    }

    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<String>, AiClientError> {
        let body = ImageGenerationBody {
            model: &request.model,
            prompt: &request.prompt,
            n: request.count,
            size: &request.size,
            response_format: "b64_json",
            style: request.style.map(|s| s.as_str()),
        };

        tracing::debug!(model = %request.model, size = %request.size, n = request.count, "Sending image generation request");

        let response = self
            .send(self.client.post(self.url("images/generations")).json(&body))
            .await?;
        Self::decode_images(parse_json(response).await?)
    }

    async fn edit_image(&self, request: &ImageEditRequest) -> Result<Vec<String>, AiClientError> {
        let mut form = multipart::Form::new()
            .text("model", request.model.clone())
            .text("prompt", request.prompt.clone())
            .text("size", request.size.clone())
            .text("n", "1")
            .text("response_format", "b64_json")
            .part(
                "image",
                Self::image_part(request.image.clone(), request.image_name.clone())?,
            );
        if let Some(mask) = &request.mask {
            form = form.part("mask", Self::image_part(mask.clone(), "mask.png".to_string())?);
        }

        tracing::debug!(model = %request.model, "Sending image edit request");

        let response = self
            .send(self.client.post(self.url("images/edits")).multipart(form))
            .await?;
        Self::decode_images(parse_json(response).await?)
    }

    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, AiClientError> {
        let endpoint = if request.translate {
            "audio/translations"
        } else {
            "audio/transcriptions"
        };

        let file_part = multipart::Part::bytes(request.audio.clone())
            .file_name(request.file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| AiClientError::Transport(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", request.model.clone())
            .text("response_format", "json")
            .part("file", file_part);
        if let (false, Some(language)) = (request.translate, &request.language) {
            form = form.text("language", language.clone());
        }

        tracing::debug!(model = %request.model, endpoint, "Sending audio to OpenAI");

        let response = self
            .send(self.client.post(self.url(endpoint)).multipart(form))
            .await?;
        let parsed: TranscriptionResponse = parse_json(response).await?;

        tracing::info!(chars = parsed.text.len(), "OpenAI transcription completed");

        Ok(parsed.text.trim().to_string())
    }

    async fn synthesize_speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, AiClientError> {
        let body = SpeechBody {
            model: &request.model,
            voice: &request.voice,
            input: &request.input,
        };

        tracing::debug!(model = %request.model, voice = %request.voice, "Sending speech request");

        let response = self
            .send(self.client.post(self.url("audio/speech")).json(&body))
            .await?;
        let audio = response.bytes().await.map_err(map_transport_error)?;
        Ok(audio.to_vec())
    }
}
