// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityRequest type for POST /similarity

use serde::{Deserialize, Serialize};

/// Request body for POST /similarity
///
/// ```json
/// {
///   "userEmbedding": [0.1, 0.2, 0.3],
///   "recipeEmbeddings": [[0.1, 0.2, 0.3], [0.3, 0.2, 0.1]]
/// }
/// ```
///
/// Missing fields deserialize as `None` and are reported by the scorer as
/// missing embeddings rather than as a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityRequest {
    /// Reference vector
    #[serde(default)]
    pub user_embedding: Option<Vec<f64>>,

    /// Candidate vectors, scored in this order
    #[serde(default)]
    pub recipe_embeddings: Option<Vec<Vec<f64>>>,
}

impl SimilarityRequest {
    pub fn new(user_embedding: Vec<f64>, recipe_embeddings: Vec<Vec<f64>>) -> Self {
        Self {
            user_embedding: Some(user_embedding),
            recipe_embeddings: Some(recipe_embeddings),
        }
    }

    pub fn reference(&self) -> &[f64] {
        self.user_embedding.as_deref().unwrap_or_default()
    }

    pub fn candidates(&self) -> &[Vec<f64>] {
        self.recipe_embeddings.as_deref().unwrap_or_default()
    }
}
