// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for router-level tests
//!
//! `StubEmbedder` produces deterministic pseudo-embeddings from a text hash
//! so the HTTP layer can be tested without model files.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use minilm_embed_service::{
    api::{create_app, ApiConfig, AppState},
    embeddings::TextEmbedder,
};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const STUB_DIMENSION: usize = 384;

pub struct StubEmbedder {
    dimension: usize,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // Linear congruential step, mapped into [-1, 1]
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
                ^ (i as u64);
            let value = (seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "stub-minilm"
    }
}

/// Always fails, to exercise the 500 path
pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(anyhow::anyhow!("ONNX inference failed: simulated fault"))
    }

    fn dimension(&self) -> usize {
        STUB_DIMENSION
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}

pub fn app_with(embedder: Arc<dyn TextEmbedder>, config: ApiConfig) -> Router {
    create_app(AppState::new(embedder, config))
}

pub fn stub_app() -> Router {
    app_with(
        Arc::new(StubEmbedder::new(STUB_DIMENSION)),
        ApiConfig::default(),
    )
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    (status, body)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Parses a JSON float array out of a response body
pub fn floats(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|v| v.as_f64().expect("expected a number"))
        .collect()
}
