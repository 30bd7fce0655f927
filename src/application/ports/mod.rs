mod ai_client;
mod artifact_store;

pub use ai_client::{
    AiClient, AiClientError, ChatCompletion, ChatMessage, ChatRequest, ChatRole, ImageEditRequest,
    ImageGenerationRequest, SpeechRequest, TranscriptionRequest,
};
pub use artifact_store::{ArtifactEntry, ArtifactStore, ArtifactStoreError};
