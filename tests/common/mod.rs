//! Common test utilities for integration tests
//!
//! Provides corpus fixtures and deterministic embedding providers used
//! across multiple integration test files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use robot_rag::{DomainError, DomainResult, EmbeddingProvider};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Write `(relative path, content)` files under `root/corpus` and return
/// the corpus directory.
pub fn write_corpus(root: &Path, files: &[(&str, &[u8])]) -> PathBuf {
    let corpus = root.join("corpus");
    std::fs::create_dir_all(&corpus).expect("Failed to create corpus dir");
    for (relative, content) in files {
        let path = corpus.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create corpus dir");
        }
        std::fs::write(path, content).expect("Failed to write corpus file");
    }
    corpus
}

/// Embeds text as a 26-dimensional ASCII letter histogram.
///
/// Deterministic and model-agnostic, so texts sharing letters score high.
#[derive(Default)]
pub struct LetterEmbedder {
    pub calls: AtomicUsize,
}

impl LetterEmbedder {
    pub fn histogram(text: &str) -> Vec<f32> {
        let mut counts = vec![0.0; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            counts[usize::from(c.to_ascii_lowercase() as u8 - b'a')] += 1.0;
        }
        counts
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    fn name(&self) -> &'static str {
        "letters"
    }

    async fn embed_batch(&self, texts: &[String], _model: &str) -> DomainResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::histogram(t)).collect())
    }
}

/// Returns the same vector for every input.
pub struct FixedEmbedder(pub Vec<f32>);

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed_batch(&self, texts: &[String], _model: &str) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.0.clone()).collect())
    }
}

/// Always fails, standing in for an unreachable embedding service.
pub struct UnavailableEmbedder;

#[async_trait]
impl EmbeddingProvider for UnavailableEmbedder {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn embed_batch(&self, _texts: &[String], _model: &str) -> DomainResult<Vec<Vec<f32>>> {
        Err(DomainError::EmbeddingFailed("connection refused".to_string()))
    }
}
