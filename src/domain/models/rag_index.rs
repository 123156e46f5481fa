//! The in-memory index aggregate and its similarity search.

use serde::{Deserialize, Serialize};

use super::chunking::IndexEntry;
use crate::domain::errors::{DomainError, DomainResult};

/// Euclidean norm of a vector.
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Dot product of two equally sized vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Substitute 1.0 for a zero norm so all-zero vectors score 0 instead of NaN.
fn guard_norm(norm: f32) -> f32 {
    if norm == 0.0 {
        1.0
    } else {
        norm
    }
}

/// A stored entry paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    /// Position of the entry in the index
    pub index: usize,
    /// Cosine similarity to the query
    pub score: f32,
    pub entry: IndexEntry,
}

/// Chunks, their embeddings and precomputed norms, built with one model.
///
/// `entries`, `embeddings` and `norms` are positionally aligned and always
/// have the same length. All embeddings share one dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct RagIndex {
    model: String,
    entries: Vec<IndexEntry>,
    embeddings: Vec<Vec<f32>>,
    norms: Vec<f32>,
}

impl RagIndex {
    /// Assemble and validate an index.
    ///
    /// When `norms` is `None` they are recomputed from the embeddings.
    pub fn new(
        model: impl Into<String>,
        entries: Vec<IndexEntry>,
        embeddings: Vec<Vec<f32>>,
        norms: Option<Vec<f32>>,
    ) -> DomainResult<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::InvalidIndex(
                "embedding model name is empty".to_string(),
            ));
        }

        if entries.len() != embeddings.len() {
            return Err(DomainError::InvalidIndex(format!(
                "{} entries but {} embeddings",
                entries.len(),
                embeddings.len()
            )));
        }

        if let Some(first) = embeddings.first() {
            let dimension = first.len();
            if let Some((position, vector)) = embeddings
                .iter()
                .enumerate()
                .find(|(_, v)| v.len() != dimension)
            {
                return Err(DomainError::InvalidIndex(format!(
                    "embedding {} has dimension {}, expected {}",
                    position,
                    vector.len(),
                    dimension
                )));
            }
        }

        if let Some(entry) = entries.iter().find(|e| e.start >= e.end) {
            return Err(DomainError::InvalidIndex(format!(
                "chunk {} of '{}' has empty range [{}, {})",
                entry.chunk_id, entry.source, entry.start, entry.end
            )));
        }

        let norms = match norms {
            Some(norms) if norms.len() != embeddings.len() => {
                return Err(DomainError::InvalidIndex(format!(
                    "{} norms but {} embeddings",
                    norms.len(),
                    embeddings.len()
                )));
            }
            Some(norms) => norms,
            None => embeddings.iter().map(|v| l2_norm(v)).collect(),
        };

        Ok(Self {
            model,
            entries,
            embeddings,
            norms,
        })
    }

    /// Identifier of the embedding model the index was built with
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn norms(&self) -> &[f32] {
        &self.norms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensionality, `None` for an empty index.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    /// Check that every stored norm matches the norm recomputed from its vector.
    pub fn verify_norms(&self, tolerance: f32) -> bool {
        self.embeddings
            .iter()
            .zip(&self.norms)
            .all(|(vector, stored)| (l2_norm(vector) - stored).abs() <= tolerance * stored.max(1.0))
    }

    /// Score every entry against `query` and return the best `k`.
    ///
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// their original index order.
    pub fn rank(&self, query: &[f32], k: usize) -> DomainResult<Vec<ScoredEntry>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dimension) = self.dimension() {
            if dimension != query.len() {
                return Err(DomainError::ValidationFailed(format!(
                    "query embedding has dimension {}, index '{}' expects {}",
                    query.len(),
                    self.model,
                    dimension
                )));
            }
        }

        let query_norm = guard_norm(l2_norm(query));

        let mut scored: Vec<(f32, usize)> = self
            .embeddings
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(idx, (vector, norm))| (dot(query, vector) / (guard_norm(*norm) * query_norm), idx))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, index)| ScoredEntry {
                index,
                score,
                entry: self.entries[index].clone(),
            })
            .collect())
    }
}
