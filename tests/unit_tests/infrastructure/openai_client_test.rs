use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use nutrilab::application::ports::{
    AiClient, AiClientError, ChatMessage, ChatRequest, ImageGenerationRequest, SpeechRequest,
    TranscriptionRequest,
};
use nutrilab::infrastructure::ai::OpenAiClient;

async fn start_mock_openai_server(
    path: &str,
    response_status: u16,
    response_body: &'static [u8],
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        path,
        post(move || async move {
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/v1", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn client(base_url: &str) -> OpenAiClient {
    OpenAiClient::new(
        "sk-test".to_string(),
        Some(base_url.to_string()),
        Some(Duration::from_secs(5)),
    )
    .unwrap()
}

fn chat_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        temperature: 0.4,
        max_tokens: 50,
        json_response: true,
    }
}

#[test]
fn given_blank_api_key_when_creating_client_then_reports_unconfigured() {
    let client = OpenAiClient::new("   ".to_string(), None, None).unwrap();
    assert!(!client.is_configured());
}

#[tokio::test]
async fn given_chat_reply_when_completing_then_returns_content_and_usage() {
    let body = br#"{"choices":[{"message":{"role":"assistant","content":"{\"summary\":\"ok\"}"}}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
    let (base_url, shutdown_tx) = start_mock_openai_server("/v1/chat/completions", 200, body).await;

    let completion = client(&base_url)
        .chat_completion(&chat_request())
        .await
        .unwrap();

    assert_eq!(completion.content, r#"{"summary":"ok"}"#);
    assert_eq!(completion.usage.unwrap().total_tokens, 15);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_429_when_completing_then_returns_rate_limited() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/chat/completions", 429, b"slow down").await;

    let result = client(&base_url).chat_completion(&chat_request()).await;

    assert!(matches!(result, Err(AiClientError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_500_when_completing_then_returns_api_request_failed_with_body() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/chat/completions", 500, b"upstream broke").await;

    let result = client(&base_url).chat_completion(&chat_request()).await;

    match result {
        Err(AiClientError::ApiRequestFailed { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream broke");
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_malformed_json_when_completing_then_returns_invalid_response() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/chat/completions", 200, b"<html>").await;

    let result = client(&base_url).chat_completion(&chat_request()).await;

    assert!(matches!(result, Err(AiClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_b64_images_when_generating_then_returns_payloads() {
    let body = br#"{"created":1,"data":[{"b64_json":"AAAA"},{"b64_json":"BBBB"}]}"#;
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/images/generations", 200, body).await;

    let payloads = client(&base_url)
        .generate_images(&ImageGenerationRequest {
            model: "dall-e-2".to_string(),
            prompt: "salad".to_string(),
            size: "512x512".to_string(),
            style: None,
            count: 2,
        })
        .await
        .unwrap();

    assert_eq!(payloads, vec!["AAAA".to_string(), "BBBB".to_string()]);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_image_data_when_generating_then_returns_invalid_response() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/images/generations", 200, br#"{"data":[]}"#).await;

    let result = client(&base_url)
        .generate_images(&ImageGenerationRequest {
            model: "dall-e-2".to_string(),
            prompt: "salad".to_string(),
            size: "512x512".to_string(),
            style: None,
            count: 1,
        })
        .await;

    assert!(matches!(result, Err(AiClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_transcription_reply_when_transcribing_then_returns_trimmed_text() {
    let (base_url, shutdown_tx) = start_mock_openai_server(
        "/v1/audio/transcriptions",
        200,
        br#"{"text":"  Hello there  "}"#,
    )
    .await;

    let text = client(&base_url)
        .transcribe(&TranscriptionRequest {
            model: "whisper-1".to_string(),
            audio: b"fake audio".to_vec(),
            file_name: "note.mp3".to_string(),
            language: Some("en".to_string()),
            translate: false,
        })
        .await
        .unwrap();

    assert_eq!(text, "Hello there");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_translate_flag_when_transcribing_then_uses_translation_endpoint() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/audio/translations", 200, br#"{"text":"Hello"}"#).await;

    let text = client(&base_url)
        .transcribe(&TranscriptionRequest {
            model: "whisper-1".to_string(),
            audio: b"hola".to_vec(),
            file_name: "nota.mp3".to_string(),
            language: None,
            translate: true,
        })
        .await
        .unwrap();

    assert_eq!(text, "Hello");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_audio_bytes_when_synthesizing_then_returns_raw_bytes() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server("/v1/audio/speech", 200, b"ID3\x00\x01audio").await;

    let audio = client(&base_url)
        .synthesize_speech(&SpeechRequest {
            model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
            input: "Hello".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(audio, b"ID3\x00\x01audio");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_slow_server_when_request_exceeds_timeout_then_returns_timeout() {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = Router::new().route(
        "/v1/audio/speech",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "late"
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    let client = OpenAiClient::new(
        "sk-test".to_string(),
        Some(base_url),
        Some(Duration::from_millis(100)),
    )
    .unwrap();
    let result = client
        .synthesize_speech(&SpeechRequest {
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            input: "Hello".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AiClientError::Timeout)));
    shutdown_tx.send(()).ok();
}
