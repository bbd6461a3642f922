// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Cosine similarity scoring
//!
//! Scores a reference vector against a list of candidate vectors. Input
//! validation lives here so the HTTP layer only has to map errors.
//!
//! Zero-norm vectors carry no direction; they score `0.0` against anything.

use thiserror::Error;

/// Reasons a similarity request cannot be scored.
///
/// Every variant is caused by the caller's input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("Missing embeddings: reference vector is empty")]
    EmptyReference,
    #[error("Missing embeddings: no candidate vectors provided")]
    NoCandidates,
    #[error("Dimension mismatch at candidate {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Non-finite value in {location} at position {position}")]
    NonFinite { location: String, position: usize },
}

/// Cosine similarity between two vectors, accumulated in f64.
///
/// Returns `0.0` when the lengths differ or either vector is all zeros. The
/// result is clamped to `[-1.0, 1.0]`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    match (unit_direction(a), unit_direction(b)) {
        (Some(a), Some(b)) => dot(&a, &b).clamp(-1.0, 1.0),
        _ => 0.0,
    }
}

/// Euclidean length of a vector.
///
/// Components are scaled by the largest magnitude first, so the sum of
/// squares neither overflows nor underflows for finite input.
pub fn l2_norm(v: &[f64]) -> f64 {
    let max = max_abs(v);
    if max == 0.0 {
        return 0.0;
    }
    max * v.iter().map(|x| (x / max).powi(2)).sum::<f64>().sqrt()
}

/// Scores `reference` against every candidate, preserving candidate order.
///
/// The reference direction is computed once; each candidate costs one pass.
pub fn score_candidates(
    reference: &[f64],
    candidates: &[Vec<f64>],
) -> Result<Vec<f64>, SimilarityError> {
    if reference.is_empty() {
        return Err(SimilarityError::EmptyReference);
    }
    if candidates.is_empty() {
        return Err(SimilarityError::NoCandidates);
    }

    check_finite(reference, || "userEmbedding".to_string())?;

    let expected = reference.len();
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.len() != expected {
            return Err(SimilarityError::DimensionMismatch {
                index,
                expected,
                actual: candidate.len(),
            });
        }
        check_finite(candidate, || format!("recipeEmbeddings[{}]", index))?;
    }

    let Some(reference) = unit_direction(reference) else {
        return Ok(vec![0.0; candidates.len()]);
    };

    let scores = candidates
        .iter()
        .map(|candidate| match unit_direction(candidate) {
            Some(candidate) => dot(&reference, &candidate).clamp(-1.0, 1.0),
            None => 0.0,
        })
        .collect();

    Ok(scores)
}

/// Unit-length copy of `v`, or `None` for an all-zero vector.
///
/// Dividing by the largest magnitude before squaring keeps every
/// intermediate within `[0, len]`, whatever the input's exponent range.
fn unit_direction(v: &[f64]) -> Option<Vec<f64>> {
    let max = max_abs(v);
    if max == 0.0 {
        return None;
    }

    let scaled: Vec<f64> = v.iter().map(|x| x / max).collect();
    let norm = scaled.iter().map(|x| x * x).sum::<f64>().sqrt();
    Some(scaled.into_iter().map(|x| x / norm).collect())
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn check_finite(v: &[f64], location: impl FnOnce() -> String) -> Result<(), SimilarityError> {
    match v.iter().position(|x| !x.is_finite()) {
        Some(position) => Err(SimilarityError::NonFinite {
            location: location(),
            position,
        }),
        None => Ok(()),
    }
}
