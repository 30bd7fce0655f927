mod artifact_category;
mod artifact_name;
mod image;
mod meal_plan;
mod speech;
mod token_usage;

pub use artifact_category::{ArtifactCategory, MediaKind, UnknownCategory};
pub use artifact_name::{
    DEFAULT_MAX_LENGTH, FALLBACK_STEM, TIMESTAMP_FORMAT, safe_filename, timestamped_stem,
};
pub use image::{ImageBatchRecord, ImageRecord, ImageStyle, MAX_IMAGES_PER_REQUEST};
pub use meal_plan::{
    MEAL_PLAN_SYSTEM_PROMPT, MealPlanRecord, MealPlanRequest, ParsedPlan, RAW_PLAN_KEY,
    parse_plan,
};
pub use speech::{
    SUMMARY_SYSTEM_PROMPT, SpeechRecord, SummaryRecord, TranscriptRecord,
    render_summary_markdown,
};
pub use token_usage::TokenUsage;
