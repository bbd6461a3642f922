// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs the all-MiniLM-L6-v2 sentence transformer with ONNX Runtime.
//!
//! Pipeline per text:
//! - BERT tokenization, truncated to `max_seq_length`
//! - transformer forward pass (token-level embeddings)
//! - attention-masked mean pooling
//! - optional L2 normalization
//!
//! With the `cuda` feature the CUDA execution provider is tried first and
//! CPU is used if it cannot be initialised.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis, Ix2};
use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::pooling::{l2_normalize, mean_pool};
use super::{EmbeddingModelConfig, ModelFiles, TextEmbedder};

/// ONNX-based sentence embedding model
///
/// Cloning is cheap: the session and tokenizer are shared behind `Arc`.
/// The session itself needs exclusive access to run, so concurrent
/// requests queue on its mutex for the forward pass only.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    /// Discovered from a probe inference at load time
    dimension: usize,
    max_length: usize,
    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer and validates the output shape.
    ///
    /// # Errors
    /// - model or tokenizer file missing or invalid
    /// - ONNX Runtime initialization fails
    /// - the model does not produce `[batch, seq_len, hidden]` outputs
    /// - `config.expected_dimension` is set and does not match
    ///
    /// # Example
    /// ```ignore
    /// let files = ModelFiles::in_dir("./models/all-MiniLM-L6-v2-onnx");
    /// let model = OnnxEmbeddingModel::new(&EmbeddingModelConfig::default(), &files).await?;
    /// assert_eq!(model.dimension(), 384);
    /// ```
    pub async fn new(config: &EmbeddingModelConfig, files: &ModelFiles) -> Result<Self> {
        let config = config.clone();
        let files = files.clone();
        tokio::task::spawn_blocking(move || Self::load(&config, &files))
            .await
            .context("Model loading task failed")?
    }

    fn load(config: &EmbeddingModelConfig, files: &ModelFiles) -> Result<Self> {
        let model_path = files.model_path.as_path();
        let tokenizer_path = files.tokenizer_path.as_path();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let session = create_session(model_path, config.intra_threads)?;
        info!("ONNX embedding model loaded from {}", model_path.display());

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        // One text per forward pass: padding only adds masked tokens
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        let session = Mutex::new(session);

        let probe = run_inference(&session, &tokenizer, "validation test", false)
            .context("Validation inference failed")?;
        let dimension = probe.len();
        if dimension == 0 {
            anyhow::bail!("Model produced an empty embedding during validation");
        }
        if let Some(expected) = config.expected_dimension {
            if expected != dimension {
                anyhow::bail!(
                    "Model {} outputs {} dimensions (expected {})",
                    config.model_name,
                    dimension,
                    expected
                );
            }
        }

        info!(
            "Embedding model {} ready ({} dimensions, max {} tokens)",
            config.model_name, dimension, config.max_seq_length
        );

        Ok(Self {
            session: Arc::new(session),
            tokenizer: Arc::new(tokenizer),
            model_name: config.model_name.clone(),
            dimension,
            max_length: config.max_seq_length,
            normalize: config.normalize,
        })
    }

    /// Maximum number of tokens fed to the model
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let session = self.session.clone();
        let tokenizer = self.tokenizer.clone();
        let normalize = self.normalize;
        let text = text.to_owned();

        let embedding = tokio::task::spawn_blocking(move || {
            run_inference(&session, &tokenizer, &text, normalize)
        })
        .await
        .context("Embedding task failed")??;

        if embedding.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                embedding.len(),
                self.dimension
            );
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn create_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::CUDAExecutionProvider;
        use tracing::warn;

        info!("Attempting CUDA execution provider...");
        match build_session(
            CUDAExecutionProvider::default().build(),
            model_path,
            intra_threads,
        ) {
            Ok(session) => {
                info!("CUDA execution provider initialized");
                return Ok(session);
            }
            Err(e) => {
                warn!("CUDA execution provider failed: {:#}", e);
                warn!("Falling back to CPU execution provider");
            }
        }
    }

    build_session(
        CPUExecutionProvider::default().build(),
        model_path,
        intra_threads,
    )
    .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}

fn build_session(
    provider: ExecutionProviderDispatch,
    model_path: &Path,
    intra_threads: usize,
) -> Result<Session> {
    let session = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([provider])
        .context("Failed to set execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Tokenize, run the forward pass and pool one text into a sentence vector.
fn run_inference(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    text: &str,
    normalize: bool,
) -> Result<Vec<f32>> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let token_type_ids: Vec<i64> = vec![0i64; input_ids.len()];
    let seq_len = input_ids.len();
    debug!("Tokenized input into {} tokens", seq_len);

    let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids)
        .context("Failed to create input_ids array")?;
    let attention_mask_array = Array2::from_shape_vec((1, seq_len), attention_mask.clone())
        .context("Failed to create attention_mask array")?;
    let token_type_ids_array = Array2::from_shape_vec((1, seq_len), token_type_ids)
        .context("Failed to create token_type_ids array")?;

    let mut session_guard = session
        .lock()
        .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
    let outputs = session_guard.run(ort::inputs![
        "input_ids" => Value::from_array(input_ids_array)?,
        "attention_mask" => Value::from_array(attention_mask_array)?,
        "token_type_ids" => Value::from_array(token_type_ids_array)?
    ])?;

    // Output names differ between exports; the token embeddings come first
    let output_array = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;

    if output_array.ndim() != 3 {
        anyhow::bail!(
            "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden])",
            output_array.shape()
        );
    }

    let token_embeddings = output_array
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix2>()
        .context("Failed to view token embeddings as [seq_len, hidden]")?;

    let mut embedding = mean_pool(token_embeddings, &attention_mask);
    if normalize {
        l2_normalize(&mut embedding);
    }

    Ok(embedding)
}
