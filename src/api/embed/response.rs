// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for POST /embed

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// ```json
/// { "embedding": [0.012, -0.087, ...] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    /// Sentence embedding; length equals the model dimension
    pub embedding: Vec<f32>,
}

impl EmbedResponse {
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

impl From<Vec<f32>> for EmbedResponse {
    fn from(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }
}
