//! OpenAI-compatible HTTP embedding provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};
use crate::config::TriageConfig;

/// Remote embedding provider speaking the `/embeddings` wire format.
///
/// Works against OpenAI and any compatible self-hosted endpoint. Purity is
/// delegated to the endpoint: the same `(model, text)` request is assumed
/// to return the same vector.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a provider from config; fails when no API key is set.
    pub fn from_config(config: &TriageConfig) -> Result<Self, EmbeddingError> {
        let api_key = config
            .embedding_api_key
            .clone()
            .ok_or(EmbeddingError::MissingApiKey)?;
        Ok(Self::new(
            config.embedding_base_url.clone(),
            config.embedding_model.clone(),
            api_key,
        ))
    }

    async fn request(&self, input: serde_json::Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Endpoint { status, body });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        debug!(vectors = parsed.data.len(), model = %self.model, "embedding response received");
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self
            .request(serde_json::Value::String(text.to_string()))
            .await?;
        if vectors.is_empty() {
            return Err(EmbeddingError::MissingVector { index: 0 });
        }
        Ok(vectors.swap_remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let input = serde_json::Value::Array(
            texts
                .iter()
                .map(|t| serde_json::Value::String(t.clone()))
                .collect(),
        );
        let vectors = self.request(input).await?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::MissingVector {
                index: vectors.len(),
            });
        }
        Ok(vectors)
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}
