//! robot-rag - retrieval-augmented generation over a local text corpus
//!
//! Builds a persisted similarity-search index from a directory of text files
//! and retrieves the chunks most relevant to a query, assembled into a
//! bounded context string for prompting a language model.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): index model, chunking rules, errors, ports
//! - **Adapters** (`adapters`): embedding backends (Ollama, OpenAI-compatible)
//! - **Service Layer** (`services`): indexer, retriever, prompt augmentation
//! - **Infrastructure Layer** (`infrastructure`): config, logging, chunker,
//!   artifact storage
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use robot_rag::{build_prompt, Config, RagRetriever, RetrieverConfig};
//! use robot_rag::adapters::embeddings::build_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let embedder = build_provider(&config.embedding)?;
//!     let retriever = RagRetriever::new(RetrieverConfig::from(&config), embedder);
//!     let context = retriever.context_for("Where is the charging dock?").await;
//!     println!("{}", build_prompt("Where is the charging dock?", &context));
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ArtifactFormat, ChunkingConfig, Config, EmbeddingConfig, IndexEntry, IndexManifest,
    LoggingConfig, RagIndex, ScoredEntry,
};
pub use domain::ports::EmbeddingProvider;
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{chunk_text, clean_text, Chunker, IndexStore};
pub use services::{
    build_prompt, IndexOutcome, Indexer, IndexerOptions, RagRetriever, RetrieverConfig,
};
