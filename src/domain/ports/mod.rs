//! Port trait definitions (Hexagonal Architecture)
//!
//! - EmbeddingProvider: turns text into vectors via an external service
//!
//! Adapters in `crate::adapters` implement these so the indexer and
//! retriever stay independent of any particular embedding backend.

pub mod embedding;
pub mod null_embedding;

pub use embedding::EmbeddingProvider;
pub use null_embedding::NullEmbeddingProvider;
