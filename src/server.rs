//! HTTP server initialization and runtime setup.

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::config::Config;
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server until SIGTERM or Ctrl-C.
///
/// Initializes:
/// - Upload directory
/// - Application state and route table
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The upload directory cannot be created
/// - Route registration fails (duplicate routes)
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    tokio::fs::create_dir_all(&config.upload_directory)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload_directory.display()
            )
        })?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;

    let state = AppState::new(config);
    let router = app_router(&state).context("Failed to register routes")?;
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = sigterm => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
