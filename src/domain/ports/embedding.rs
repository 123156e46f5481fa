//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};

/// Trait for embedding providers.
///
/// The model is chosen per call: an index records the model it was built
/// with, and queries against it must use the same one.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "ollama", "openai", "null").
    fn name(&self) -> &'static str;

    /// Generate embeddings for multiple texts.
    ///
    /// Returns exactly one vector per input, in input order. Implementations
    /// split the request if the backend has per-request limits.
    async fn embed_batch(&self, texts: &[String], model: &str) -> DomainResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str, model: &str) -> DomainResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()], model)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::EmbeddingFailed("Empty embedding response".to_string()))
    }
}
