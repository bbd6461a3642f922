// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod similarity;
pub mod version;

pub use api::{create_app, start_server, ApiConfig, ApiError, AppState};
pub use config::ServiceConfig;
pub use embeddings::{EmbeddingModelConfig, ModelFiles, OnnxEmbeddingModel, TextEmbedder};
pub use similarity::{cosine_similarity, score_candidates, SimilarityError};
