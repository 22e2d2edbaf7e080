use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use dexpush_backend::{AppState, build_router};
use dexpush_publisher::PublisherConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "dexpush-backend",
    version,
    about = "Serve the catalog publishing endpoints"
)]
struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8888")]
    bind: String,
    #[command(flatten)]
    publisher: PublisherConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::parse();
    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind))?;

    let state = AppState::from_config(&config.publisher)?;
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("failed to bind TCP listener")?;

    info!(
        %bind_addr,
        site = %config.publisher.site_url,
        organization = %config.publisher.organization_id,
        source = %config.publisher.source_id,
        "server starting"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(?err, "failed to listen for CTRL+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => tracing::warn!(?err, "failed to listen for TERM signal"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
