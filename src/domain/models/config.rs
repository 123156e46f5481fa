use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::artifact::ArtifactFormat;
use super::chunking::ChunkingConfig;

/// Main configuration structure
///
/// The top-level RAG keys are flat so that `RAG_TOP_K`, `RAG_EMBED_MODEL`
/// and friends map onto them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Directory holding the text corpus
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Location of the index artifact; `<data_dir>/rag_index.bin` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,

    /// Embedding model used to build indexes
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Character budget for assembled context
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunk overlap in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// File extensions picked up by the indexer
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Encoding of artifacts written by the indexer
    #[serde(default)]
    pub artifact_format: ArtifactFormat,

    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// File name of the index artifact inside the data directory
pub const DEFAULT_INDEX_FILE: &str = "rag_index.bin";

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

const fn default_top_k() -> usize {
    4
}

const fn default_max_context_chars() -> usize {
    3200
}

const fn default_chunk_size() -> usize {
    900
}

const fn default_chunk_overlap() -> usize {
    180
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Config {
    pub const fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }

    /// Index artifact location, following `data_dir` unless set explicitly
    pub fn resolved_index_path(&self) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_INDEX_FILE))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_path: None,
            embed_model: default_embed_model(),
            top_k: default_top_k(),
            max_context_chars: default_max_context_chars(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            extensions: default_extensions(),
            artifact_format: ArtifactFormat::default(),
            embedding: EmbeddingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Embedding service backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// `OpenAI`-compatible `/embeddings` endpoint
    OpenAi,
    /// Embeddings disabled; every call fails
    Null,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Base URL; each provider has its own default when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key for hosted providers
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum texts per request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_max_batch_size() -> usize {
    512
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for log files: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
