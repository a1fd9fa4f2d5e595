//! Scripted embedding provider for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{EmbeddingError, EmbeddingProvider, HashedEmbedder};

/// Test provider with preset vectors and failure injection.
///
/// Lookup is by substring: the first scripted key (in lexicographic order)
/// contained in the input text wins. Texts matching no script fall back to
/// [`HashedEmbedder`], so fixtures only script the vectors a test actually
/// cares about.
pub struct ScriptedEmbedder {
    vectors: BTreeMap<String, Vec<f32>>,
    failures: Vec<String>,
    fallback: HashedEmbedder,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: BTreeMap::new(),
            failures: Vec::new(),
            fallback: HashedEmbedder::new(dimension),
            calls: AtomicUsize::new(0),
        }
    }

    /// Scripts a vector for any text containing `key`.
    pub fn with_vector(mut self, key: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(key.into(), vector);
        self
    }

    /// Injects a failure for any text containing `key`.
    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.failures.push(key.into());
        self
    }

    /// Number of `embed` calls observed (cache-bypass assertions).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedEmbedder {
    fn default() -> Self {
        Self::new(HashedEmbedder::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(key) = self.failures.iter().find(|k| text.contains(k.as_str())) {
            return Err(EmbeddingError::Unavailable {
                reason: format!("scripted failure for '{key}'"),
            });
        }

        if let Some((_, vector)) = self.vectors.iter().find(|(k, _)| text.contains(k.as_str())) {
            return Ok(vector.clone());
        }

        self.fallback.embed(text).await
    }

    fn model_id(&self) -> String {
        format!("scripted-{}", self.fallback.dimension())
    }
}
