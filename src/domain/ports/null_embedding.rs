//! Null embedding provider implementation.
//!
//! Used when embeddings are disabled. Every call fails, so the indexer
//! refuses to build and the retriever degrades to empty results.

use async_trait::async_trait;

use super::embedding::EmbeddingProvider;
use crate::domain::errors::{DomainError, DomainResult};

/// An embedding provider that never produces vectors.
#[derive(Debug, Clone, Default)]
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn embed_batch(&self, texts: &[String], model: &str) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Err(DomainError::EmbeddingFailed(format!(
            "embeddings are disabled (requested {} text(s) with model '{}')",
            texts.len(),
            model
        )))
    }
}
