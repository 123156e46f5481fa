//! Index building
//!
//! Turns a directory of text documents into a persisted index artifact:
//! discover → decode → clean → chunk → embed → serialize.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use walkdir::WalkDir;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    l2_norm, ArtifactFormat, ChunkingConfig, Config, IndexEntry, IndexManifest, RagIndex,
};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::vector::{manifest_path_for, Chunker, IndexStore};

/// Parameters of one indexer run
#[derive(Debug, Clone)]
pub struct IndexerOptions {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub model: String,
    pub chunking: ChunkingConfig,
    pub format: ArtifactFormat,
    /// File extensions to index, without the leading dot
    pub extensions: Vec<String>,
}

impl From<&Config> for IndexerOptions {
    fn from(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            output: config.resolved_index_path(),
            model: config.embed_model.clone(),
            chunking: config.chunking(),
            format: config.artifact_format,
            extensions: config.extensions.clone(),
        }
    }
}

/// A document read from the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path relative to the data directory, `/`-separated
    pub source: String,
    pub content: String,
    /// True when the file was not valid UTF-8 and was decoded as Latin-1
    pub lossy: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexSummary {
    pub output: PathBuf,
    pub manifest: PathBuf,
    pub documents: usize,
    pub entries: usize,
    pub dimension: usize,
    pub model: String,
    pub format: ArtifactFormat,
}

/// Result of an indexer run
#[derive(Debug, Clone)]
pub enum IndexOutcome {
    /// Artifact and manifest were written
    Written(IndexSummary),
    /// No matching documents under the data directory; nothing written
    NoDocuments { data_dir: PathBuf },
    /// Documents were found but all of them were blank; nothing written
    NoChunks { documents: usize },
}

/// Decode file bytes as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback never fails and never drops bytes.
pub fn decode_text(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => (err.into_bytes().iter().map(|&b| char::from(b)).collect(), true),
    }
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

fn relative_source(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Recursively read every matching document under `root`, sorted by path.
///
/// Unreadable entries are logged and skipped. A missing root yields no
/// documents.
pub fn discover_documents(root: &Path, extensions: &[String]) -> Vec<SourceDocument> {
    if !root.is_dir() {
        tracing::warn!(data_dir = %root.display(), "data directory does not exist");
        return Vec::new();
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !matches_extension(entry.path(), extensions) {
            continue;
        }

        let bytes = match std::fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "skipping unreadable file");
                continue;
            }
        };

        let (content, lossy) = decode_text(bytes);
        let source = relative_source(root, entry.path());
        if lossy {
            tracing::debug!(%source, "file is not valid UTF-8, decoded as Latin-1");
        }
        documents.push(SourceDocument {
            source,
            content,
            lossy,
        });
    }

    documents
}

/// Chunk every document, numbering chunks per document from 0.
pub fn build_entries(documents: &[SourceDocument], chunking: ChunkingConfig) -> Vec<IndexEntry> {
    let chunker = Chunker::new(chunking);
    documents
        .iter()
        .flat_map(|doc| chunker.chunk_document(&doc.source, &doc.content))
        .collect()
}

/// Builds index artifacts using an embedding provider
pub struct Indexer {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Embed `entries` in a single batch and assemble the index.
    pub async fn embed_entries(&self, entries: Vec<IndexEntry>, model: &str) -> DomainResult<RagIndex> {
        let texts: Vec<String> = entries.iter().map(|e| e.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts, model).await?;

        if embeddings.len() != entries.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "expected {} embeddings, received {}",
                entries.len(),
                embeddings.len()
            )));
        }

        let norms = embeddings.iter().map(|v| l2_norm(v)).collect();
        RagIndex::new(model, entries, embeddings, Some(norms))
    }

    /// Run the full pipeline and persist the result.
    ///
    /// Nothing is written unless every chunk was embedded.
    pub async fn run(&self, options: &IndexerOptions) -> DomainResult<IndexOutcome> {
        if options.model.trim().is_empty() {
            return Err(DomainError::ValidationFailed("embedding model name is empty".to_string()));
        }

        let (data_dir, extensions) = (options.data_dir.clone(), options.extensions.clone());
        let documents =
            tokio::task::spawn_blocking(move || discover_documents(&data_dir, &extensions)).await?;
        if documents.is_empty() {
            tracing::warn!(
                data_dir = %options.data_dir.display(),
                extensions = ?options.extensions,
                "no documents found, nothing to index"
            );
            return Ok(IndexOutcome::NoDocuments {
                data_dir: options.data_dir.clone(),
            });
        }

        let entries = build_entries(&documents, options.chunking);
        if entries.is_empty() {
            tracing::warn!(documents = documents.len(), "documents contain no text, nothing to index");
            return Ok(IndexOutcome::NoChunks {
                documents: documents.len(),
            });
        }

        tracing::info!(
            documents = documents.len(),
            chunks = entries.len(),
            model = %options.model,
            provider = self.embedder.name(),
            "embedding chunks"
        );
        let index = self.embed_entries(entries, &options.model).await?;
        let entry_count = index.len();
        let dimension = index.dimension().unwrap_or(0);

        let manifest_path = manifest_path_for(&options.output);
        let manifest = IndexManifest {
            data_dir: options.data_dir.display().to_string(),
            entries: entry_count,
            model: options.model.clone(),
            chunk_size: options.chunking.chunk_size,
            chunk_overlap: options.chunking.chunk_overlap,
            documents: documents.len(),
            dimension,
            format: options.format,
            built_at: Utc::now(),
        };

        let (output, format, manifest_out) =
            (options.output.clone(), options.format, manifest_path.clone());
        tokio::task::spawn_blocking(move || -> DomainResult<()> {
            IndexStore::save(&index, &output, format)?;
            tracing::info!(path = %output.display(), entries = index.len(), "wrote index");
            IndexStore::save_manifest(&manifest, &manifest_out)
        })
        .await??;

        Ok(IndexOutcome::Written(IndexSummary {
            output: options.output.clone(),
            manifest: manifest_path,
            documents: documents.len(),
            entries: entry_count,
            dimension,
            model: options.model.clone(),
            format: options.format,
        }))
    }
}
