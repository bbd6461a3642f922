// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityResponse type for POST /similarity

use serde::{Deserialize, Serialize};

/// Response body for POST /similarity
///
/// One score per candidate, in request order, each in `[-1, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResponse {
    pub similarities: Vec<f64>,
}

impl From<Vec<f64>> for SimilarityResponse {
    fn from(similarities: Vec<f64>) -> Self {
        Self { similarities }
    }
}
