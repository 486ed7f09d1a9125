use anyhow::Context;
use deployment::Deployment;
use installer_server::{DeploymentImpl, routes};
use services::services::config::ServerConfig;
use tracing_subscriber::{EnvFilter, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,installer_server={level},executors={level},services={level},local_deployment={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).context("invalid RUST_LOG level")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ServerConfig::from_env()?;
    let deployment = DeploymentImpl::new(config.clone()).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    let actual_addr = listener.local_addr()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        timeout_secs = config.command_timeout.as_secs(),
        "Server running on http://{actual_addr}"
    );

    axum::serve(listener, routes::router(deployment))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
