use std::sync::Arc;

use crate::application::ports::{AiClient, ArtifactStore};
use crate::application::services::{
    GalleryService, ImageService, MealPlanService, SpeechSynthesisService, TranscriptionService,
};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub meal_plan_service: Arc<MealPlanService>,
    pub image_service: Arc<ImageService>,
    pub transcription_service: Arc<TranscriptionService>,
    pub speech_service: Arc<SpeechSynthesisService>,
    pub gallery_service: Arc<GalleryService>,
    pub artifact_store: Arc<dyn ArtifactStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wires every adapter to the same client and store.
    pub fn new(
        settings: Settings,
        client: Arc<dyn AiClient>,
        artifact_store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let retry = settings.retry_policy();

        Self {
            meal_plan_service: Arc::new(MealPlanService::new(
                Arc::clone(&client),
                Arc::clone(&artifact_store),
                retry,
                settings.meal_plan_defaults(),
            )),
            image_service: Arc::new(ImageService::new(
                Arc::clone(&client),
                Arc::clone(&artifact_store),
                retry,
                settings.image_defaults(),
            )),
            transcription_service: Arc::new(TranscriptionService::new(
                Arc::clone(&client),
                Arc::clone(&artifact_store),
                retry,
                settings.transcription_defaults(),
            )),
            speech_service: Arc::new(SpeechSynthesisService::new(
                Arc::clone(&client),
                Arc::clone(&artifact_store),
                retry,
                settings.speech_defaults(),
            )),
            gallery_service: Arc::new(GalleryService::new(Arc::clone(&artifact_store))),
            artifact_store,
            settings: Arc::new(settings),
        }
    }
}
