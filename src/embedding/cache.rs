//! Bounded TTL cache in front of an embedding provider.
//!
//! Keys are BLAKE3 hashes of model id + canonical text, so entries survive
//! only as long as both the content and the provider's vector space are
//! unchanged. Errors are never cached.

use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};
use crate::config::TriageConfig;
use crate::hashing::hash_embedding_key;

/// Caching wrapper around any [`EmbeddingProvider`].
pub struct CachedEmbedder<P> {
    inner: P,
    entries: Cache<[u8; 32], Vec<f32>>,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    const DEFAULT_CAPACITY: u64 = 10_000;
    const DEFAULT_TTL_SECS: u64 = 86_400;

    /// Wraps `inner` with the default capacity and TTL.
    pub fn new(inner: P) -> Self {
        Self::with_settings(inner, Self::DEFAULT_CAPACITY, Self::DEFAULT_TTL_SECS)
    }

    /// Wraps `inner` with an entry capacity (LRU eviction) and TTL.
    pub fn with_settings(inner: P, capacity: u64, ttl_secs: u64) -> Self {
        Self {
            inner,
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }

    /// Wraps `inner` using the cache settings from `config`.
    pub fn from_config(inner: P, config: &TriageConfig) -> Self {
        Self::with_settings(
            inner,
            config.embedding_cache_capacity,
            config.embedding_cache_ttl_secs,
        )
    }

    /// Number of cached vectors.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = hash_embedding_key(&self.inner.model_id(), text);

        if let Some(vector) = self.entries.get(&key) {
            debug!("embedding cache hit");
            return Ok(vector);
        }

        let vector = self.inner.embed(text).await?;
        self.entries.insert(key, vector.clone());
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model_id = self.inner.model_id();
        let keys: Vec<[u8; 32]> = texts
            .iter()
            .map(|t| hash_embedding_key(&model_id, t))
            .collect();

        let mut vectors: Vec<Option<Vec<f32>>> =
            keys.iter().map(|key| self.entries.get(key)).collect();

        let missing: Vec<usize> = vectors
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_none().then_some(i))
            .collect();

        if !missing.is_empty() {
            let missing_texts: Vec<String> =
                missing.iter().map(|&i| texts[i].clone()).collect();
            let fetched = self.inner.embed_batch(&missing_texts).await?;

            if fetched.len() != missing.len() {
                return Err(EmbeddingError::MissingVector {
                    index: fetched.len(),
                });
            }

            for (&i, vector) in missing.iter().zip(fetched) {
                self.entries.insert(keys[i], vector.clone());
                vectors[i] = Some(vector);
            }
        }

        Ok(vectors.into_iter().flatten().collect())
    }

    fn model_id(&self) -> String {
        self.inner.model_id()
    }
}
