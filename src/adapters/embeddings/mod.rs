//! Embedding service adapters.

pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::ports::{EmbeddingProvider, NullEmbeddingProvider};

pub use ollama::{OllamaEmbeddingConfig, OllamaEmbeddingProvider};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};

/// Build the provider selected by configuration.
pub fn build_provider(config: &EmbeddingConfig) -> DomainResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::Ollama => {
            Arc::new(OllamaEmbeddingProvider::new(OllamaEmbeddingConfig::from(config))?)
        }
        EmbeddingProviderKind::OpenAi => {
            Arc::new(OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig::from(config))?)
        }
        EmbeddingProviderKind::Null => Arc::new(NullEmbeddingProvider::new()),
    };
    tracing::debug!(provider = provider.name(), "embedding provider ready");
    Ok(provider)
}
