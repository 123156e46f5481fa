//! Domain errors for the RAG index.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-level errors that can occur while building or querying an index.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Failed to load index from {}: {reason}", path.display())]
    IndexLoad { path: PathBuf, reason: String },

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Wrap any displayable failure as an index load error for `path`.
    pub fn index_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::IndexLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DomainError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

impl From<bincode::Error> for DomainError {
    fn from(err: bincode::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
