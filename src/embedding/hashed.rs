//! Offline hashed embedding provider.
//!
//! Tokenizes the canonical text and hashes each token into one of `d`
//! signed buckets (the feature-hashing trick), then L2-normalizes. No
//! model weights, no network: the same text always maps to the same
//! vector, which is the property Tier 1 clustering actually depends on.
//! Semantic quality is far below a learned model; this provider exists
//! for CI, air-gapped runs, and tests.

use async_trait::async_trait;
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};
use crate::hashing::hash_token_to_u64;

/// Feature-hashing embedder over lowercased alphanumeric tokens.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    /// Default vector dimension.
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let mut token_count = 0usize;

        for token in tokenize(text) {
            let hash = hash_token_to_u64(&token);
            let bucket = (hash % self.dimension as u64) as usize;
            // High bit decides the sign, keeping bucket collisions from
            // only ever accumulating in one direction.
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
            token_count += 1;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        } else {
            debug!(token_count, "canonical text produced a zero vector");
        }

        vector
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn model_id(&self) -> String {
        format!("hashed-bow-{}", self.dimension)
    }
}

/// Lowercased alphanumeric tokens, everything else a separator.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
