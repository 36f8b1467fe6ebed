// src/server/metrics_server.rs

//! The optional HTTP endpoint exposing Prometheus metrics.

use crate::core::metrics::{self, gather_metrics};
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Serves `GET /metrics`, refreshing the queue-length gauge first.
async fn scrape(state: Arc<ServerState>) -> impl IntoResponse {
    metrics::PLAYLIST_LENGTH.set(state.playlist.lock().len() as f64);
    (StatusCode::OK, [("content-type", CONTENT_TYPE)], gather_metrics())
}

/// Binds the metrics port from the config and serves until shutdown is broadcast.
pub async fn run_metrics_server(
    state: Arc<ServerState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.metrics.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics server on {addr}"))?;
    info!("Metrics available at http://{}/metrics", addr);

    let app = Router::new().route("/metrics", get(move || scrape(state.clone())));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Metrics server shutting down.");
        })
        .await?;
    Ok(())
}
