mod app_state;
mod azure_devops;
mod config;
mod dispatch;
mod error;
mod handlers;
mod pipeline;
mod pipeline_client;
mod webhook_payloads;

use std::sync::Arc;

use app_state::AppState;
use azure_devops::AzureDevOpsClient;
use config::RelayConfig;
use error::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;

    let client = AzureDevOpsClient::new(&config.personal_access_token, &config.api_version)?;
    let app_state = Arc::new(AppState::new(&config, Arc::new(client)));

    tracing::info!(
        pipeline = %config.pipeline_name,
        api_version = %config.api_version,
        azure = config.azure.is_some(),
        github = config.github.is_some(),
        "Relay configured"
    );

    let app = handlers::router(app_state);

    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Can't listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}
