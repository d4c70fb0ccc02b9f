use std::collections::HashMap;

use super::{EmbeddingClient, EmbeddingError};

/// Deterministic embedder: the same text always maps to the same vector.
///
/// Vectors are derived from a cheap FNV-style hash of the input, so tests
/// get stable, distinct, non-zero embeddings without any network.
#[derive(Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Creates an embedder producing vectors of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbeddingClient for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for b in text.bytes() {
            state ^= u64::from(b);
            state = state.wrapping_mul(0x100_0000_01b3);
        }

        let v: Vec<f32> = (0..self.dim)
            .map(|i| {
                let mixed = state
                    .wrapping_add(i as u64)
                    .wrapping_mul(0x9e37_79b9_7f4a_7c15);
                // Keep components in (0, 1]; never all-zero.
                ((mixed >> 40) as f32 + 1.0) / 16_777_217.0
            })
            .collect();
        Ok(v)
    }
}

/// Embedder with canned per-text vectors, for scenarios that need exact
/// geometry (e.g. known nearest neighbors).
#[derive(Clone, Default)]
pub struct FixtureEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixtureEmbedder {
    /// Creates an empty fixture set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the vector returned for `text`.
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

impl EmbeddingClient for FixtureEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or(EmbeddingError::EmptyResponse)
    }
}
