// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for POST /embed

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Request body for POST /embed
///
/// ```json
/// { "text": "Creamy tomato pasta with basil" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Text to embed. A missing or `null` field is a client error.
    #[serde(default)]
    pub text: Option<String>,
}

impl EmbedRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Validates the request and returns the text to embed
    ///
    /// # Validation Rules
    /// 1. `text` must be present
    /// 2. `text` must not be empty or whitespace-only
    /// 3. `text` must not exceed `max_chars` characters
    pub fn validate(&self, max_chars: usize) -> Result<&str, ApiError> {
        let text = match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Err(ApiError::ValidationError {
                    field: "text".to_string(),
                    message: "Missing text".to_string(),
                })
            }
        };

        let char_count = text.chars().count();
        if char_count > max_chars {
            return Err(ApiError::ValidationError {
                field: "text".to_string(),
                message: format!(
                    "text cannot exceed {} characters (got {} characters)",
                    max_chars, char_count
                ),
            });
        }

        Ok(text)
    }
}
