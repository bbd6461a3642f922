// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::server::AppState;
use crate::api::ApiError;

/// POST /embed handler
///
/// Embeds one text with the shared model.
///
/// - 400: body is not JSON, `text` missing/empty, or text too long
/// - 500: tokenizer or model inference failure
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request.validate(state.config.max_text_chars)?;

    let response = EmbedResponse::from(state.embedder.embed(text).await?);

    debug!(
        "Embedded {} characters into {} dimensions",
        text.chars().count(),
        response.dimension()
    );

    Ok(Json(response))
}
