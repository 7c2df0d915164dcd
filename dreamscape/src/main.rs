use anyhow::{Context, Result};
use dreamscape::{DEFAULT_LOG_FILTER, DreamscapeConfig, build_router, build_services};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = DreamscapeConfig::from_env().context("invalid configuration")?;
    let services = build_services(&config).context("failed to wire services")?;
    let app = build_router(services);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(phase = "startup", event = "listening", %addr, "Dreamscape server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!(phase = "shutdown", event = "ctrl_c", "Shutting down");
    }
}
