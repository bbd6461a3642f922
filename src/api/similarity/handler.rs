// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarity HTTP handler

use axum::{extract::rejection::JsonRejection, Json};
use tracing::debug;

use crate::api::similarity::{SimilarityRequest, SimilarityResponse};
use crate::api::ApiError;
use crate::similarity::score_candidates;

/// POST /similarity handler
///
/// - 400: body is not JSON, embeddings missing or empty, a candidate's
///   dimension differs from the reference, or a value is not finite
pub async fn similarity_handler(
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let Json(request) = payload?;

    let similarities = score_candidates(request.reference(), request.candidates())?;

    debug!(
        "Scored {} candidates of dimension {}",
        similarities.len(),
        request.reference().len()
    );

    Ok(Json(SimilarityResponse::from(similarities)))
}
