use nutrilab::application::services::{ServiceError, SpeechDefaults, SpeechSynthesisService};
use nutrilab::domain::ArtifactCategory;
use nutrilab::infrastructure::ai::MockAiClient;

use crate::support::{Fixture, fixture, no_retry};

fn service(fx: &Fixture) -> SpeechSynthesisService {
    SpeechSynthesisService::new(
        fx.client.clone(),
        fx.store.clone(),
        no_retry(),
        SpeechDefaults {
            model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
        },
    )
}

#[tokio::test]
async fn given_text_when_synthesizing_then_mp3_is_saved_with_defaults() {
    let fx = fixture(MockAiClient::new().with_speech_audio(b"ID3audio".to_vec()));

    let record = service(&fx)
        .text_to_speech("Drink more water.", None, None)
        .await
        .unwrap();

    assert_eq!(record.voice, "alloy");
    assert_eq!(record.model, "gpt-4o-mini-tts");
    assert!(record.path.starts_with(fx.store.directory(ArtifactCategory::Logs)));
    assert_eq!(record.path.extension().unwrap(), "mp3");
    assert_eq!(std::fs::read(&record.path).unwrap(), b"ID3audio");
}

#[tokio::test]
async fn given_explicit_voice_when_synthesizing_then_voice_is_used() {
    let fx = fixture(MockAiClient::new());

    let record = service(&fx)
        .text_to_speech("Hello", Some("nova"), Some("tts-1"))
        .await
        .unwrap();

    assert_eq!(record.voice, "nova");
    assert_eq!(record.model, "tts-1");
}

#[tokio::test]
async fn given_empty_text_when_synthesizing_then_invalid_input_without_call() {
    let fx = fixture(MockAiClient::new());

    let result = service(&fx).text_to_speech("", None, None).await;

    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
async fn given_empty_audio_when_synthesizing_then_invalid_response() {
    let fx = fixture(MockAiClient::new().with_speech_audio(Vec::new()));

    let result = service(&fx).text_to_speech("Hello", None, None).await;

    assert!(matches!(result, Err(ServiceError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_unconfigured_client_when_synthesizing_then_configuration_error() {
    let fx = fixture(MockAiClient::unconfigured());

    let result = service(&fx).text_to_speech("Hello", None, None).await;

    assert!(matches!(result, Err(ServiceError::Configuration(_))));
}
