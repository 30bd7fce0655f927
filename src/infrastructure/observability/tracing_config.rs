use std::path::{Path, PathBuf};

use crate::domain::ArtifactCategory;
use crate::presentation::config::{Environment, LoggingSettings};

pub const LOG_FILE_NAME: &str = "app.log";

/// Configuration for tracing initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    pub environment: Environment,
    /// Directive used when `RUST_LOG` is not set.
    pub default_directive: String,
    pub json_format: bool,
    pub log_file: Option<PathBuf>,
}

impl TracingConfig {
    pub fn from_settings(
        settings: &LoggingSettings,
        environment: Environment,
        data_root: &Path,
    ) -> Self {
        let log_file = settings.file.then(|| {
            data_root
                .join(ArtifactCategory::Logs.dir_name())
                .join(LOG_FILE_NAME)
        });

        Self {
            environment,
            default_directive: format!(
                "{level},nutrilab={level},tower_http=debug",
                level = settings.level
            ),
            json_format: settings.json,
            log_file,
        }
    }
}
