// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model configuration and model file resolution
//!
//! Model files (`model.onnx`, `tokenizer.json`) are taken from a local
//! directory when present. Otherwise they are fetched once from the
//! HuggingFace Hub and served from its local cache on later starts.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// ONNX export inside the sentence-transformers repository
const HUB_MODEL_FILE: &str = "onnx/model.onnx";
const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Configuration for loading the embedding model
#[derive(Debug, Clone, Args)]
pub struct EmbeddingModelConfig {
    /// Model name reported by the health endpoint
    #[arg(long, env = "EMBEDDING_MODEL_NAME", default_value = "all-MiniLM-L6-v2")]
    pub model_name: String,

    /// Directory holding model.onnx and tokenizer.json
    #[arg(
        long,
        env = "EMBEDDING_MODEL_DIR",
        default_value = "./models/all-MiniLM-L6-v2-onnx"
    )]
    pub model_dir: PathBuf,

    /// HuggingFace Hub repository used when the local files are missing
    #[arg(
        long,
        env = "EMBEDDING_MODEL_REPO",
        default_value = "sentence-transformers/all-MiniLM-L6-v2"
    )]
    pub model_repo: String,

    /// Allow downloading missing model files from the Hub
    #[arg(long = "model-download", env = "EMBEDDING_MODEL_DOWNLOAD", default_value_t = true, action = clap::ArgAction::Set)]
    pub download: bool,

    /// Tokens beyond this length are truncated
    #[arg(long, env = "EMBEDDING_MAX_SEQ_LENGTH", default_value_t = 256)]
    pub max_seq_length: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "EMBEDDING_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// L2-normalize embeddings after pooling
    #[arg(long, env = "EMBEDDING_NORMALIZE", default_value_t = true, action = clap::ArgAction::Set)]
    pub normalize: bool,

    /// Fail at startup unless the model outputs this many dimensions
    #[arg(long, env = "EMBEDDING_EXPECTED_DIMENSION")]
    pub expected_dimension: Option<usize>,
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self {
            model_name: "all-MiniLM-L6-v2".to_string(),
            model_dir: PathBuf::from("./models/all-MiniLM-L6-v2-onnx"),
            model_repo: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            download: true,
            max_seq_length: 256,
            intra_threads: 4,
            normalize: true,
            expected_dimension: None,
        }
    }
}

/// Paths to the files needed to run the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl ModelFiles {
    /// Expected file layout inside a local model directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model_path: dir.join("model.onnx"),
            tokenizer_path: dir.join("tokenizer.json"),
        }
    }

    pub fn exists(&self) -> bool {
        self.model_path.is_file() && self.tokenizer_path.is_file()
    }

    /// Finds the model files, downloading them if allowed and needed.
    pub async fn resolve(config: &EmbeddingModelConfig) -> Result<Self> {
        let local = Self::in_dir(&config.model_dir);
        if local.exists() {
            info!("Using local model files in {}", config.model_dir.display());
            return Ok(local);
        }

        if !config.download {
            anyhow::bail!(
                "Model files not found in {} (expected model.onnx and tokenizer.json) and downloads are disabled",
                config.model_dir.display()
            );
        }

        info!(
            "Model files not found in {}, fetching {} from HuggingFace Hub",
            config.model_dir.display(),
            config.model_repo
        );

        let repo_id = config.model_repo.clone();
        tokio::task::spawn_blocking(move || download_from_hub(&repo_id))
            .await
            .context("Model download task failed")?
    }
}

fn download_from_hub(repo_id: &str) -> Result<ModelFiles> {
    let api = hf_hub::api::sync::Api::new().context("Failed to create HuggingFace Hub client")?;
    let repo = api.model(repo_id.to_string());

    let model_path = repo
        .get(HUB_MODEL_FILE)
        .with_context(|| format!("Failed to fetch {} from {}", HUB_MODEL_FILE, repo_id))?;
    let tokenizer_path = repo
        .get(HUB_TOKENIZER_FILE)
        .with_context(|| format!("Failed to fetch {} from {}", HUB_TOKENIZER_FILE, repo_id))?;

    info!("Model files available at {}", model_path.display());

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}
