// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod server;
pub mod similarity;

pub use embed::{embed_handler, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, HEALTH_STATUS};
pub use server::{create_app, start_server, ApiConfig, AppState};
pub use similarity::{similarity_handler, SimilarityRequest, SimilarityResponse};
