pub mod artifact;
pub mod chunking;
pub mod config;
pub mod manifest;
pub mod rag_index;

pub use artifact::{ArtifactFormat, ARTIFACT_MAGIC, ARTIFACT_VERSION};
pub use chunking::{ChunkWindow, ChunkingConfig, IndexEntry};
pub use config::{Config, EmbeddingConfig, EmbeddingProviderKind, LoggingConfig};
pub use manifest::IndexManifest;
pub use rag_index::{dot, l2_norm, RagIndex, ScoredEntry};
