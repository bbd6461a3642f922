// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding backend
//!
//! The HTTP layer talks to [`TextEmbedder`]; [`OnnxEmbeddingModel`] is the
//! production implementation (all-MiniLM-L6-v2 on ONNX Runtime).

pub mod model_files;
pub mod onnx_model;
pub mod pooling;

use anyhow::Result;
use async_trait::async_trait;

pub use model_files::{EmbeddingModelConfig, ModelFiles};
pub use onnx_model::OnnxEmbeddingModel;

/// A loaded, read-only text embedding model.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embeds one text. The result always has `dimension()` elements.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension of the model
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
