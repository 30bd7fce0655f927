use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

use super::TracingConfig;

#[derive(Debug, thiserror::Error)]
pub enum InitTracingError {
    #[error("log file: {0}")]
    LogFile(#[from] io::Error),
    #[error("subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Initialize the tracing subscriber with structured logging.
///
/// When `config.log_file` is set, events are also appended to that file
/// without ANSI colouring.
pub fn init_tracing(config: &TracingConfig, port: u16) -> Result<(), InitTracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let log_file = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    if config.json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(log_file.map(|file| {
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file))
            }))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(log_file.map(|file| {
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file))
            }))
            .try_init()?;
    }

    tracing::info!(
        port = port,
        environment = %config.environment,
        json_format = config.json_format,
        log_file = ?config.log_file,
        "Server initialized"
    );

    Ok(())
}
