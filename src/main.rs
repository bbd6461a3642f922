// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use minilm_embed_service::{
    api::{start_server, AppState},
    config::ServiceConfig,
    embeddings::{ModelFiles, OnnxEmbeddingModel, TextEmbedder},
    version,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load();

    // RUST_LOG wins when set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting {}", version::get_version_string());

    let files = ModelFiles::resolve(&config.model)
        .await
        .context("Failed to locate embedding model files")?;

    let model = OnnxEmbeddingModel::new(&config.model, &files)
        .await
        .context("Failed to load embedding model")?;
    info!(
        "Embedding model {} loaded ({} dimensions)",
        model.model_name(),
        model.dimension()
    );

    let state = AppState::new(Arc::new(model), config.api);
    start_server(state).await
}
