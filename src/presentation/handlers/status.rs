use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub configured: AdapterStatus,
    pub defaults: ActiveDefaults,
}

#[derive(Serialize)]
pub struct AdapterStatus {
    pub meal_plan: bool,
    pub images: bool,
    pub transcription: bool,
    pub speech: bool,
}

#[derive(Serialize)]
pub struct ActiveDefaults {
    pub chat_model: String,
    pub image_size: String,
    pub voice: String,
}

pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        configured: AdapterStatus {
            meal_plan: state.meal_plan_service.is_configured(),
            images: state.image_service.is_configured(),
            transcription: state.transcription_service.is_configured(),
            speech: state.speech_service.is_configured(),
        },
        defaults: ActiveDefaults {
            chat_model: state.meal_plan_service.default_model().to_string(),
            image_size: state.image_service.default_size().to_string(),
            voice: state.speech_service.default_voice().to_string(),
        },
    })
}
