//! Retrieval service
//!
//! Loads the persisted index on first use, embeds queries with the model the
//! index was built with, and assembles the best-matching chunks into a
//! bounded context string.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Config, IndexEntry, RagIndex, ScoredEntry};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::vector::IndexStore;

/// Retriever settings
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    pub index_path: PathBuf,
    /// Model assumed for artifacts that do not record one
    pub default_model: String,
    pub top_k: usize,
    pub max_context_chars: usize,
}

impl From<&Config> for RetrieverConfig {
    fn from(config: &Config) -> Self {
        Self {
            index_path: config.resolved_index_path(),
            default_model: config.embed_model.clone(),
            top_k: config.top_k,
            max_context_chars: config.max_context_chars,
        }
    }
}

/// Observable state of the index cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// No load has been attempted yet
    NotAttempted,
    /// A load was attempted and found no usable index
    Unavailable,
    /// An index is cached
    Loaded,
}

enum CachedIndex {
    NotAttempted,
    Unavailable,
    Loaded(Arc<RagIndex>),
}

/// Retrieves context for queries from a persisted index
pub struct RagRetriever {
    config: RetrieverConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Mutex<CachedIndex>,
}

impl RagRetriever {
    /// Create a retriever. Nothing is loaded until the first query.
    pub fn new(config: RetrieverConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            embedder,
            cache: Mutex::new(CachedIndex::NotAttempted),
        }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    pub async fn status(&self) -> IndexStatus {
        match &*self.cache.lock().await {
            CachedIndex::NotAttempted => IndexStatus::NotAttempted,
            CachedIndex::Unavailable => IndexStatus::Unavailable,
            CachedIndex::Loaded(_) => IndexStatus::Loaded,
        }
    }

    /// Get the cached index, loading it on first use.
    ///
    /// A missing or unreadable artifact is remembered as unavailable and is
    /// not retried until [`reload_index`](Self::reload_index).
    pub async fn get_index(&self) -> Option<Arc<RagIndex>> {
        let mut cache = self.cache.lock().await;
        match &*cache {
            CachedIndex::Loaded(index) => Some(Arc::clone(index)),
            CachedIndex::Unavailable => None,
            CachedIndex::NotAttempted => {
                let loaded = self.load().await;
                *cache = match &loaded {
                    Some(index) => CachedIndex::Loaded(Arc::clone(index)),
                    None => CachedIndex::Unavailable,
                };
                loaded
            }
        }
    }

    /// Discard the cached index and load the artifact again.
    ///
    /// Callers holding a previous snapshot keep using it; the new index is
    /// swapped in only once fully loaded.
    pub async fn reload_index(&self) -> Option<Arc<RagIndex>> {
        let loaded = self.load().await;
        let mut cache = self.cache.lock().await;
        *cache = match &loaded {
            Some(index) => CachedIndex::Loaded(Arc::clone(index)),
            None => CachedIndex::Unavailable,
        };
        tracing::info!(available = loaded.is_some(), "index reloaded");
        loaded
    }

    async fn load(&self) -> Option<Arc<RagIndex>> {
        let path = self.config.index_path.clone();
        if !path.exists() {
            tracing::info!(path = %path.display(), "index not found, retrieval disabled");
            return None;
        }

        let default_model = self.config.default_model.clone();
        let result = tokio::task::spawn_blocking(move || {
            IndexStore::load_with_default_model(&path, &default_model)
        })
        .await
        .map_err(|e| DomainError::index_load(&self.config.index_path, e))
        .and_then(|loaded| loaded);

        match result {
            Ok(index) => {
                tracing::info!(
                    path = %self.config.index_path.display(),
                    entries = index.len(),
                    model = index.model(),
                    "index loaded"
                );
                Some(Arc::new(index))
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load index, retrieval disabled");
                None
            }
        }
    }

    /// Rank index entries against `query`, best first.
    ///
    /// # Returns
    /// * `Ok(vec![])` - blank query, `k == 0`, or no usable index
    /// * `Err(_)` - embedding failed or returned a vector of the wrong size
    pub async fn search(&self, query: &str, k: usize) -> DomainResult<Vec<ScoredEntry>> {
        if query.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let Some(index) = self.get_index().await else {
            return Ok(Vec::new());
        };
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query, index.model()).await?;
        let ranked = index.rank(&query_vector, k)?;
        tracing::debug!(k, hits = ranked.len(), "ranked query");
        Ok(ranked)
    }

    /// Top-`k` entries for `query`. Failures are logged and yield no entries.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<IndexEntry> {
        match self.search(query, k).await {
            Ok(hits) => hits.into_iter().map(|hit| hit.entry).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "retrieval failed");
                Vec::new()
            }
        }
    }

    /// Retrieve and assemble context within a character budget.
    pub async fn retrieve_context(&self, query: &str, k: usize, max_chars: usize) -> String {
        let entries = self.retrieve(query, k).await;
        assemble_context(&entries, max_chars)
    }

    /// [`retrieve_context`](Self::retrieve_context) with the configured
    /// `top_k` and `max_context_chars`.
    pub async fn context_for(&self, query: &str) -> String {
        self.retrieve_context(query, self.config.top_k, self.config.max_context_chars)
            .await
    }

    pub fn index_path(&self) -> &Path {
        &self.config.index_path
    }
}

/// Join chunk texts with blank lines, truncating so the chunk characters
/// (separators excluded) never exceed `max_chars`.
pub fn assemble_context(entries: &[IndexEntry], max_chars: usize) -> String {
    let mut remaining = max_chars;
    let mut parts: Vec<String> = Vec::new();

    for entry in entries {
        if remaining == 0 {
            break;
        }
        let text = entry.text.trim();
        if text.is_empty() {
            continue;
        }
        let snippet: String = text.chars().take(remaining).collect();
        remaining -= snippet.chars().count();
        parts.push(snippet);
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ArtifactFormat;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Returns a fixed vector per known text, `[0, 0]` otherwise.
    #[derive(Default)]
    struct TableEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl TableEmbedder {
        fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.to_string(), vector);
            self
        }
    }

    #[async_trait]
    impl EmbeddingProvider for TableEmbedder {
        fn name(&self) -> &'static str {
            "table"
        }

        async fn embed_batch(&self, texts: &[String], _model: &str) -> DomainResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| vec![0.0, 0.0]))
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn embed_batch(&self, _texts: &[String], _model: &str) -> DomainResult<Vec<Vec<f32>>> {
            Err(DomainError::EmbeddingFailed("service down".to_string()))
        }
    }

    fn entry(text: &str, chunk_id: usize) -> IndexEntry {
        IndexEntry {
            text: text.to_string(),
            source: "doc.txt".to_string(),
            chunk_id,
            start: chunk_id * 10,
            end: chunk_id * 10 + text.chars().count().max(1),
        }
    }

    fn write_index(path: &Path) {
        let index = RagIndex::new(
            "m",
            vec![entry("north", 0), entry("east", 1), entry("diagonal", 2)],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            None,
        )
        .unwrap();
        IndexStore::save(&index, path, ArtifactFormat::Binary).unwrap();
    }

    fn retriever(path: PathBuf, embedder: Arc<dyn EmbeddingProvider>) -> RagRetriever {
        RagRetriever::new(
            RetrieverConfig {
                index_path: path,
                default_model: "m".to_string(),
                top_k: 2,
                max_context_chars: 100,
            },
            embedder,
        )
    }

    #[test]
    fn test_assemble_context_budget() {
        let entries = vec![entry("abcdef", 0), entry("ghijkl", 1), entry("mnop", 2)];
        assert_eq!(assemble_context(&entries, 100), "abcdef\n\nghijkl\n\nmnop");
        assert_eq!(assemble_context(&entries, 8), "abcdef\n\ngh");
        assert_eq!(assemble_context(&entries, 6), "abcdef");
        assert_eq!(assemble_context(&entries, 0), "");
        assert_eq!(assemble_context(&[], 10), "");
    }

    #[test]
    fn test_assemble_context_trims_and_skips_blank() {
        let entries = vec![entry("  padded  ", 0), entry("   ", 1), entry("héllo", 2)];
        assert_eq!(assemble_context(&entries, 9), "padded\n\nhél");
    }

    #[tokio::test]
    async fn test_missing_index_is_cached_as_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        let embedder = Arc::new(TableEmbedder::default());
        let retriever = retriever(path.clone(), embedder.clone());

        assert_eq!(retriever.status().await, IndexStatus::NotAttempted);
        assert!(retriever.retrieve("anything", 3).await.is_empty());
        assert_eq!(retriever.status().await, IndexStatus::Unavailable);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);

        // Appearing later is not noticed without a reload
        write_index(&path);
        assert!(retriever.get_index().await.is_none());
        assert!(retriever.reload_index().await.is_some());
        assert_eq!(retriever.status().await, IndexStatus::Loaded);
    }

    #[tokio::test]
    async fn test_corrupt_index_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        std::fs::write(&path, b"not an index").unwrap();

        let retriever = retriever(path, Arc::new(TableEmbedder::default()));
        assert!(retriever.get_index().await.is_none());
        assert_eq!(retriever.status().await, IndexStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_search_ranks_by_cosine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let embedder = TableEmbedder::default().with("go north", vec![0.0, 2.0]);
        let retriever = retriever(path, Arc::new(embedder));

        let hits = retriever.search("go north", 3).await.unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.entry.text.as_str()).collect();
        assert_eq!(texts, vec!["north", "diagonal", "east"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!(hits[2].score.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_blank_query_and_zero_k_skip_embedding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let embedder = Arc::new(TableEmbedder::default());
        let retriever = retriever(path, embedder.clone());

        assert!(retriever.retrieve("   ", 3).await.is_empty());
        assert!(retriever.retrieve("query", 0).await.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_yields_empty_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let retriever = retriever(path, Arc::new(FailingEmbedder));
        assert!(retriever.search("north", 2).await.is_err());
        assert_eq!(retriever.retrieve_context("north", 2, 100).await, "");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let embedder = TableEmbedder::default().with("odd", vec![1.0, 0.0, 0.0]);
        let retriever = retriever(path, Arc::new(embedder));
        assert!(retriever.retrieve("odd", 2).await.is_empty());
    }

    #[tokio::test]
    async fn test_context_for_uses_configured_limits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let embedder = TableEmbedder::default().with("east", vec![1.0, 0.0]);
        let retriever = retriever(path, Arc::new(embedder));
        assert_eq!(retriever.context_for("east").await, "east\n\ndiagonal");
    }

    #[tokio::test]
    async fn test_reload_keeps_old_snapshot_alive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let retriever = retriever(path.clone(), Arc::new(TableEmbedder::default()));
        let before = retriever.get_index().await.unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(retriever.reload_index().await.is_none());
        assert_eq!(before.len(), 3);
        assert_eq!(retriever.status().await, IndexStatus::Unavailable);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_reads_are_served_while_reload_is_loading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        write_index(&path);

        let retriever = retriever(path.clone(), Arc::new(TableEmbedder::default()));
        assert_eq!(retriever.get_index().await.unwrap().len(), 3);

        let rebuilt = RagIndex::new("m", vec![entry("west", 0)], vec![vec![-1.0, 0.0]], None).unwrap();
        IndexStore::save(&rebuilt, &path, ArtifactFormat::Binary).unwrap();

        // The reload parks on its blocking load; the cache stays readable meanwhile
        let (reloaded, during) = tokio::join!(retriever.reload_index(), retriever.get_index());
        assert_eq!(during.unwrap().len(), 3);
        assert_eq!(reloaded.unwrap().len(), 1);
        assert_eq!(retriever.get_index().await.unwrap().len(), 1);
    }
}
