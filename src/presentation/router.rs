use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    artifact_download_handler, edit_image_handler, gallery_handler, generate_image_handler,
    health_handler, meal_plan_handler, speech_handler, status_handler, summary_handler,
    transcription_handler, version_handler,
};
use crate::presentation::state::AppState;

/// Matches the upstream limit on audio uploads.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/api/v1/status", get(status_handler))
        .route("/api/v1/meal-plans", post(meal_plan_handler))
        .route("/api/v1/images", post(generate_image_handler))
        .route("/api/v1/images/edits", post(edit_image_handler))
        .route(
            "/api/v1/audio/transcriptions",
            post(transcription_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/audio/summaries", post(summary_handler))
        .route("/api/v1/audio/speech", post(speech_handler))
        .route("/api/v1/gallery", get(gallery_handler))
        .route(
            "/api/v1/artifacts/{category}/{file_name}",
            get(artifact_download_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
