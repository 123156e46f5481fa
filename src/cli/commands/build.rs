//! `build`: index a corpus directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::embeddings::build_provider;
use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt};
use crate::domain::models::{ArtifactFormat, Config};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{IndexOutcome, Indexer, IndexerOptions};

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Directory holding the text corpus
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    /// Where to write the index artifact
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Embedding model
    #[arg(short, long)]
    pub model: Option<String>,
    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Chunk overlap in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
    /// Artifact encoding (binary, json)
    #[arg(short, long)]
    pub format: Option<ArtifactFormat>,
    /// File extension to index; repeatable
    #[arg(short, long = "extension")]
    pub extensions: Vec<String>,
}

impl BuildArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(data_dir) = &self.data_dir {
            config.data_dir.clone_from(data_dir);
        }
        if let Some(output) = &self.output {
            config.index_path = Some(output.clone());
        }
        if let Some(model) = &self.model {
            config.embed_model.clone_from(model);
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if let Some(format) = self.format {
            config.artifact_format = format;
        }
        if !self.extensions.is_empty() {
            config.extensions.clone_from(&self.extensions);
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct BuildOutput {
    pub status: &'static str,
    pub data_dir: PathBuf,
    pub output: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub documents: usize,
    pub entries: usize,
    pub dimension: usize,
    pub model: String,
}

impl BuildOutput {
    fn from_outcome(outcome: IndexOutcome, options: &IndexerOptions) -> Self {
        let mut out = Self {
            status: "written",
            data_dir: options.data_dir.clone(),
            output: None,
            manifest: None,
            documents: 0,
            entries: 0,
            dimension: 0,
            model: options.model.clone(),
        };
        match outcome {
            IndexOutcome::Written(summary) => {
                out.output = Some(summary.output);
                out.manifest = Some(summary.manifest);
                out.documents = summary.documents;
                out.entries = summary.entries;
                out.dimension = summary.dimension;
            }
            IndexOutcome::NoDocuments { .. } => out.status = "no_documents",
            IndexOutcome::NoChunks { documents } => {
                out.status = "no_chunks";
                out.documents = documents;
            }
        }
        out
    }
}

impl CommandOutput for BuildOutput {
    fn to_human(&self) -> String {
        match self.status {
            "no_documents" => format!(
                "No documents found in {}. Nothing was written.",
                self.data_dir.display()
            ),
            "no_chunks" => format!(
                "{} document(s) found in {}, but none contain text. Nothing was written.",
                self.documents,
                self.data_dir.display()
            ),
            _ => {
                let mut lines = vec![format!(
                    "Indexed {} chunk(s) from {} document(s) with {} (dimension {})",
                    self.entries, self.documents, self.model, self.dimension
                )];
                if let Some(path) = &self.output {
                    lines.push(format!("  Index:    {}", path.display()));
                }
                if let Some(path) = &self.manifest {
                    lines.push(format!("  Manifest: {}", path.display()));
                }
                lines.join("\n")
            }
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: BuildArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let embedder = build_provider(&config.embedding).context("Failed to create embedding provider")?;
    let options = IndexerOptions::from(&config);

    let spinner = create_spinner(
        format!("Indexing {} with {}", options.data_dir.display(), options.model),
        !json_mode,
    );
    let result = Indexer::new(embedder).run(&options).await;
    match &result {
        Ok(IndexOutcome::Written(summary)) => {
            spinner.finish_success(format!("{} chunk(s) indexed", summary.entries));
        }
        Ok(_) => spinner.finish_warning("nothing to index"),
        Err(_) => spinner.finish_error("indexing failed"),
    }
    let outcome = result.context("Failed to build index")?;

    output(&BuildOutput::from_outcome(outcome, &options), json_mode);
    Ok(())
}
