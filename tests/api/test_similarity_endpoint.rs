// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarity tests

use axum::http::StatusCode;
use serde_json::json;

use super::support::{floats, post_json, post_raw, stub_app};

const EPS: f64 = 1e-9;

#[tokio::test]
async fn test_unit_axes_example() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": [1, 0],
            "recipeEmbeddings": [[1, 0], [0, 1], [-1, 0]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scores = floats(&body["similarities"]);
    assert_eq!(scores.len(), 3);
    assert!((scores[0] - 1.0).abs() < EPS);
    assert!(scores[1].abs() < EPS);
    assert!((scores[2] + 1.0).abs() < EPS);
}

#[tokio::test]
async fn test_scores_preserve_candidate_order() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": [0.2, 0.4, 0.6],
            "recipeEmbeddings": [[-0.2, -0.4, -0.6], [0.2, 0.4, 0.6], [0.6, 0.4, 0.2]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scores = floats(&body["similarities"]);
    assert!((scores[0] + 1.0).abs() < EPS);
    assert!((scores[1] - 1.0).abs() < EPS);
    assert!(scores[2] > 0.0 && scores[2] < 1.0);
}

#[tokio::test]
async fn test_missing_user_embedding_is_400() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({ "recipeEmbeddings": [[1, 0]] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Missing embeddings"));
}

#[tokio::test]
async fn test_empty_candidates_is_400() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({ "userEmbedding": [1, 0], "recipeEmbeddings": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Missing embeddings"));
}

#[tokio::test]
async fn test_dimension_mismatch_is_400() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": [1, 0, 0],
            "recipeEmbeddings": [[1, 0, 0], [1, 0]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Dimension mismatch"), "got {:?}", error);
    assert!(error.contains("candidate 1"));
}

#[tokio::test]
async fn test_zero_vector_scores_zero() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": [0, 0],
            "recipeEmbeddings": [[1, 1], [0, 0]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(floats(&body["similarities"]), vec![0.0, 0.0]);
}

#[tokio::test]
async fn test_non_numeric_values_are_400() {
    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": ["a", "b"],
            "recipeEmbeddings": [[1, 0]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (status, _) = post_raw(stub_app(), "/similarity", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_embed_then_compare_round_trip() {
    let (_, a) = post_json(stub_app(), "/embed", json!({ "text": "spicy noodle soup" })).await;
    let (_, b) = post_json(stub_app(), "/embed", json!({ "text": "chocolate cake" })).await;

    let (status, body) = post_json(
        stub_app(),
        "/similarity",
        json!({
            "userEmbedding": a["embedding"],
            "recipeEmbeddings": [a["embedding"], b["embedding"]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scores = floats(&body["similarities"]);
    assert!((scores[0] - 1.0).abs() < 1e-6);
    assert!((-1.0..=1.0).contains(&scores[1]));
}

#[tokio::test]
async fn test_extreme_exponents_return_numeric_scores() {
    let (status, body) = post_raw(
        stub_app(),
        "/similarity",
        r#"{"userEmbedding": [1e200, 1e200],
            "recipeEmbeddings": [[1e200, 1e200], [1e-200, 1e-200], [-1e-200, -1e-200]]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // floats() panics on null
    let scores = floats(&body["similarities"]);
    assert!((scores[0] - 1.0).abs() < EPS);
    assert!((scores[1] - 1.0).abs() < EPS);
    assert!((scores[2] + 1.0).abs() < EPS);
}
