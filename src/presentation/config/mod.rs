mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    ENV_OVERRIDES, GenerationSettings, LoggingSettings, ModelSettings, OpenAiSettings,
    RetrySettings, ServerSettings, Settings, StorageSettings,
};
