// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Token-to-sentence pooling for transformer outputs.

use ndarray::ArrayView2;

/// Mean pooling over the sequence dimension, weighted by the attention mask.
///
/// `token_embeddings` is `[seq_len, hidden_dim]`; `attention_mask` has one
/// entry per token (1 = real token, 0 = padding). Padding tokens do not
/// contribute to the mean.
pub fn mean_pool(token_embeddings: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let (seq_len, hidden_dim) = token_embeddings.dim();

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for i in 0..seq_len.min(attention_mask.len()) {
        let mask_value = attention_mask[i] as f32;
        if mask_value == 0.0 {
            continue;
        }
        sum_mask += mask_value;
        for (j, value) in pooled.iter_mut().enumerate() {
            *value += token_embeddings[[i, j]] * mask_value;
        }
    }

    // Avoid division by zero on an all-padding sequence
    let denom = sum_mask.max(1e-9);
    for value in &mut pooled {
        *value /= denom;
    }

    pooled
}

/// Scales `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in v.iter_mut() {
            *value /= norm;
        }
    }
}
