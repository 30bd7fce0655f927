mod audio;
mod error;
mod gallery;
mod health;
mod images;
mod meal_plan;
mod status;

pub use audio::{speech_handler, summary_handler, transcription_handler};
pub use error::{ApiError, ErrorResponse};
pub use gallery::{artifact_download_handler, gallery_handler};
pub use health::{APP_VERSION, health_handler, version_handler};
pub use images::{edit_image_handler, generate_image_handler};
pub use meal_plan::meal_plan_handler;
pub use status::status_handler;
