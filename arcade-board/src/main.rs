mod config;
mod constants;
mod handlers;
mod loader;
mod models;
mod server;
mod state;
mod util;


use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::loader::CsvSource;
use crate::server::build_router;
use crate::state::AppState;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcade_board=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let source = CsvSource::from_config(&config)?;
    match &config.csv_source_url {
        Some(url) => info!(source = %url, "reading progress csv from remote source"),
        None => {
            if !config.csv_path.exists() {
                warn!(
                    path = %config.csv_path.display(),
                    "progress csv not found yet; the board will show an error until it is written"
                );
            }
            info!(path = %config.csv_path.display(), "reading progress csv from disk");
        }
    }

    let state = AppState::new(config.clone(), source);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(csv_route = %config.csv_route, "arcade-board listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let ctrl_c = tokio::signal::ctrl_c();
        let terminate = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!(?err, "failed to install SIGTERM handler");
                None
            }
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = async {
                if let Some(mut signal) = terminate {
                    signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutting down");
}
