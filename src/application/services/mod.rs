mod gallery_service;
mod image_service;
mod meal_plan_service;
mod retry_policy;
mod service_error;
mod source_file;
mod speech_synthesis_service;
mod transcription_service;

pub use gallery_service::{DEFAULT_RECENT_LIMIT, GalleryService, GallerySection};
pub use image_service::{ImageDefaults, ImageService, STYLE_CAPABLE_MODEL};
pub use meal_plan_service::{MealPlanDefaults, MealPlanService};
pub use retry_policy::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, RetryPolicy};
pub use service_error::ServiceError;
pub use speech_synthesis_service::{SpeechDefaults, SpeechSynthesisService};
pub use transcription_service::{TranscriptionDefaults, TranscriptionService};
