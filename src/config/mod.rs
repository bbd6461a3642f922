// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every option can be given as a flag or an environment variable; a `.env`
//! file in the working directory is loaded before parsing.

use clap::Parser;

use crate::api::ApiConfig;
use crate::embeddings::EmbeddingModelConfig;

/// MiniLM embedding service
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "minilm-embed-service")]
#[command(version)]
#[command(about = "HTTP sentence-embedding and cosine-similarity service", long_about = None)]
pub struct ServiceConfig {
    #[command(flatten)]
    pub api: ApiConfig,

    #[command(flatten)]
    pub model: EmbeddingModelConfig,
}

impl ServiceConfig {
    /// Loads `.env` (if present) and parses the process arguments.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }
}
