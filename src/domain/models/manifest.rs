//! Human-readable manifest written next to an index artifact.
//!
//! Informational only; the retriever never reads it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Directory the corpus was read from
    pub data_dir: String,
    /// Number of chunks in the index
    pub entries: usize,
    /// Embedding model used for every vector
    pub model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Number of documents read from the data directory
    pub documents: usize,
    /// Embedding dimensionality
    pub dimension: usize,
    pub format: ArtifactFormat,
    pub built_at: DateTime<Utc>,
}
