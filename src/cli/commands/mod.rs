//! CLI command implementations.

pub mod build;
pub mod inspect;
pub mod prompt;
pub mod query;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::embeddings::build_provider;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{RagRetriever, RetrieverConfig};

/// Retrieval flags shared by `query` and `prompt`
#[derive(Args, Debug, Clone, Default)]
pub struct RetrievalArgs {
    /// Index artifact to query
    #[arg(short, long)]
    pub index: Option<PathBuf>,
    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
    /// Character budget for the assembled context
    #[arg(long)]
    pub max_chars: Option<usize>,
}

impl RetrievalArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(index) = &self.index {
            config.index_path = Some(index.clone());
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(max_chars) = self.max_chars {
            config.max_context_chars = max_chars;
        }
    }
}

/// Apply retrieval overrides, validate, and wire a retriever to the
/// configured embedding backend.
pub(crate) fn retriever_for(mut config: Config, args: &RetrievalArgs) -> Result<RagRetriever> {
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let embedder = build_provider(&config.embedding).context("Failed to create embedding provider")?;
    Ok(RagRetriever::new(RetrieverConfig::from(&config), embedder))
}
