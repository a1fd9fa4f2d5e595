//! Embedding providers.
//!
//! The pipeline treats embedding generation as an injected capability:
//! anything implementing [`EmbeddingProvider`] can back Tier 1. Two
//! implementations ship here:
//!
//! - [`HashedEmbedder`] hashes canonical-text tokens into a fixed-dimension
//!   vector. Offline and fully deterministic; the default for CI and
//!   air-gapped runs.
//! - [`HttpEmbedder`] calls an OpenAI-compatible `/embeddings` endpoint.
//!
//! [`CachedEmbedder`] wraps either with a bounded TTL cache keyed by
//! model id + canonical text. [`text::canonical_text`] is the single
//! canonicalization every provider sees.

pub mod cache;
pub mod error;
pub mod hashed;
pub mod http;
pub mod text;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use hashed::HashedEmbedder;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedEmbedder;
pub use text::{MAX_DESCRIPTION_CHARS, MAX_DIFF_LINES, canonical_text, has_embeddable_content};

use async_trait::async_trait;

/// Maps canonical PR text to a fixed-length numeric vector.
///
/// Implementations must be pure per model identifier: the same text and the
/// same `model_id` always produce the same vector, so clustering is
/// reproducible across runs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds one canonical text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds a batch, preserving input order. The default issues one
    /// request per text; providers with a batch endpoint override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Stable model identifier. Part of every cache key, so two providers
    /// with different vector spaces never share cached entries.
    fn model_id(&self) -> String;
}
