use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, ImageDefaults, MealPlanDefaults, RetryPolicy,
    SpeechDefaults, TranscriptionDefaults,
};

use super::Environment;

/// Conventional variables mapped onto settings keys. They take precedence
/// over `appsettings.*` files and `APP__*` variables.
pub const ENV_OVERRIDES: [(&str, &str); 12] = [
    ("OPENAI_API_KEY", "openai.api_key"),
    ("OPENAI_BASE_URL", "openai.base_url"),
    ("OPENAI_DEFAULT_CHAT_MODEL", "models.chat"),
    ("OPENAI_SUMMARY_MODEL", "models.summary"),
    ("OPENAI_IMAGE_MODEL", "models.image"),
    ("OPENAI_TRANSCRIBE_MODEL", "models.transcription"),
    ("OPENAI_TTS_MODEL", "models.tts"),
    ("OPENAI_IMAGE_SIZE", "generation.image_size"),
    ("OPENAI_TTS_VOICE", "generation.voice"),
    ("OPENAI_TEMPERATURE", "generation.temperature"),
    ("OPENAI_MAX_TOKENS", "generation.max_tokens"),
    ("DATA_ROOT", "storage.data_root"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub models: ModelSettings,
    pub generation: GenerationSettings,
    pub retry: RetrySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub chat: String,
    pub summary: String,
    pub image: String,
    pub transcription: String,
    pub tts: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            chat: "gpt-4o-mini".to_string(),
            summary: "gpt-4o-mini".to_string(),
            image: "dall-e-2".to_string(),
            transcription: "whisper-1".to_string(),
            tts: "gpt-4o-mini-tts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub summary_temperature: f32,
    pub summary_max_tokens: u32,
    pub image_size: String,
    pub voice: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 900,
            summary_temperature: 0.2,
            summary_max_tokens: 500,
            image_size: "512x512".to_string(),
            voice: "alloy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_base: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_root: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Append log events to `<data_root>/logs/app.log`.
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: true,
        }
    }
}

impl Settings {
    /// Layers `appsettings.{env}`, `APP__SECTION__KEY` variables and the
    /// conventional `OPENAI_*` variables, in increasing precedence.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_with(environment, |name| std::env::var(name).ok())
    }

    /// Same as [`Settings::load`] with the conventional variables resolved by
    /// `lookup` instead of the process environment.
    pub fn load_with<F>(environment: Environment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            );

        for (variable, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, lookup(variable))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.openai.request_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.max_attempts, self.retry.backoff_base)
    }

    pub fn meal_plan_defaults(&self) -> MealPlanDefaults {
        MealPlanDefaults {
            model: self.models.chat.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
        }
    }

    pub fn image_defaults(&self) -> ImageDefaults {
        ImageDefaults {
            model: self.models.image.clone(),
            size: self.generation.image_size.clone(),
        }
    }

    pub fn transcription_defaults(&self) -> TranscriptionDefaults {
        TranscriptionDefaults {
            transcription_model: self.models.transcription.clone(),
            summary_model: self.models.summary.clone(),
            summary_temperature: self.generation.summary_temperature,
            summary_max_tokens: self.generation.summary_max_tokens,
        }
    }

    pub fn speech_defaults(&self) -> SpeechDefaults {
        SpeechDefaults {
            model: self.models.tts.clone(),
            voice: self.generation.voice.clone(),
        }
    }
}
