use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use nutrilab::infrastructure::ai::OpenAiClient;
use nutrilab::infrastructure::observability::{TracingConfig, init_tracing};
use nutrilab::infrastructure::storage::LocalArtifactStore;
use nutrilab::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let artifact_store = Arc::new(
        LocalArtifactStore::new(settings.storage.data_root.clone())
            .context("Failed to prepare data directories")?,
    );

    let tracing_config = TracingConfig::from_settings(
        &settings.logging,
        environment,
        artifact_store.data_root(),
    );
    init_tracing(&tracing_config, settings.server.port)?;

    let client = Arc::new(
        OpenAiClient::new(
            settings.openai.api_key.clone(),
            Some(settings.openai.base_url.clone()),
            Some(settings.request_timeout()),
        )
        .context("Failed to build OpenAI client")?,
    );

    if settings.openai.api_key.trim().is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; generation endpoints will answer 503");
    }

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(settings, client, artifact_store);
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
