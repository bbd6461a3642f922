// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};

use crate::api::server::AppState;
use crate::api::ApiError;
use crate::version;

pub const HEALTH_STATUS: &str = "embedding service running";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub dimensions: usize,
    pub version: String,
    pub features: Vec<String>,
}

/// GET / and GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
        model: state.embedder.model_name().to_string(),
        dimensions: state.embedder.dimension(),
        version: version::VERSION.to_string(),
        features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
