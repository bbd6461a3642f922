// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Args;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::embed::embed_handler;
use super::handlers::{health_handler, not_found_handler};
use super::similarity::similarity_handler;
use crate::embeddings::TextEmbedder;

#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Interface to bind
    #[arg(long, env = "EMBED_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "EMBED_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Longest accepted /embed text, in characters
    #[arg(long, env = "EMBED_MAX_TEXT_CHARS", default_value_t = 8192)]
    pub max_text_chars: usize,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "EMBED_MAX_BODY_BYTES", default_value_t = 16 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "EMBED_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            max_text_chars: 8192,
            max_body_bytes: 16 * 1024 * 1024,
            shutdown_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared router state: the loaded model plus request limits
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn TextEmbedder>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn TextEmbedder>, config: ApiConfig) -> Self {
        Self {
            embedder,
            config: Arc::new(config),
        }
    }
}

/// Builds the router; tests drive it directly without binding a socket.
pub fn create_app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/embed", post(embed_handler))
        .route("/similarity", post(similarity_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr();
    let drain_timeout = Duration::from_secs(state.config.shutdown_timeout_secs);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", listener.local_addr()?);
    info!("  Health:     GET  /");
    info!("  Embed:      POST /embed");
    info!("  Similarity: POST /similarity");

    let draining = Arc::new(Notify::new());
    let drain_started = draining.clone();
    let server = axum::serve(listener, create_app(state)).with_graceful_shutdown(async move {
        shutdown_signal().await;
        drain_started.notify_one();
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut server => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server error")?;
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            warn!(
                "Connections still open after {}s, forcing shutdown",
                drain_timeout.as_secs()
            );
            server.abort();
        }
    }

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
