//! Ollama embedding provider adapter.
//!
//! Uses the batched `/api/embed` endpoint of a local Ollama server. The
//! response shape is normalized here so callers only ever see one vector
//! per input text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::EmbeddingProvider;

/// Configuration for the Ollama embedding provider.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingConfig {
    /// Server URL. Default: `http://localhost:11434`.
    pub base_url: String,
    /// Request timeout in seconds. Default: 120.
    pub timeout_secs: u64,
    /// Maximum texts per single request. Default: 512.
    pub max_batch_size: usize,
}

impl Default for OllamaEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
            max_batch_size: 512,
        }
    }
}

impl From<&EmbeddingConfig> for OllamaEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config.base_url.clone().unwrap_or(defaults.base_url),
            timeout_secs: config.timeout_secs,
            max_batch_size: config.max_batch_size.max(1),
        }
    }
}

/// Ollama embedding provider.
pub struct OllamaEmbeddingProvider {
    config: OllamaEmbeddingConfig,
    client: Arc<reqwest::Client>,
}

impl OllamaEmbeddingProvider {
    pub fn new(config: OllamaEmbeddingConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::EmbeddingFailed(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    async fn call_embed_api(&self, texts: &[String], model: &str) -> DomainResult<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { model, input: texts })
            .send()
            .await
            .map_err(|e| DomainError::EmbeddingFailed(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::EmbeddingFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let result: EmbedResponse = response.json().await.map_err(|e| {
            DomainError::SerializationError(format!("Failed to parse Ollama response: {e}"))
        })?;

        let vectors = result.into_vectors()?;
        if vectors.len() != texts.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "Ollama returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn embed_batch(&self, texts: &[String], model: &str) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.max_batch_size) {
            tracing::debug!(batch = batch.len(), model, "requesting embeddings from ollama");
            all_vectors.extend(self.call_embed_api(batch, model).await?);
        }

        Ok(all_vectors)
    }
}

// -- Ollama API request/response types --

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// `/api/embed` answers with `embeddings`; older servers answer a single
/// prompt with `embedding`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Option<Vec<Vec<f32>>>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

impl EmbedResponse {
    fn into_vectors(self) -> DomainResult<Vec<Vec<f32>>> {
        match (self.embeddings, self.embedding) {
            (Some(vectors), _) => Ok(vectors),
            (None, Some(vector)) => Ok(vec![vector]),
            (None, None) => Err(DomainError::EmbeddingFailed(
                "Ollama response missing 'embeddings'".to_string(),
            )),
        }
    }
}
