//! `query`: show the context retrieved for a question.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, ScoredEntry};

use super::{retriever_for, RetrievalArgs};

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Query text
    pub text: String,
    #[command(flatten)]
    pub retrieval: RetrievalArgs,
    /// Show ranked chunks with similarity scores instead of the context
    #[arg(short, long)]
    pub scores: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct QueryOutput {
    pub query: String,
    pub index: PathBuf,
    pub index_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<Vec<ScoredEntry>>,
}

impl CommandOutput for QueryOutput {
    fn to_human(&self) -> String {
        if !self.index_available {
            return format!(
                "No index available at {}. Run `robot-rag build` first.",
                self.index.display()
            );
        }

        if let Some(hits) = &self.hits {
            if hits.is_empty() {
                return "No matching chunks.".to_string();
            }
            return TableFormatter::new().format_hits(hits);
        }

        match self.context.as_deref() {
            Some(context) if !context.is_empty() => context.to_string(),
            _ => "No matching context.".to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: QueryArgs, config: Config, json_mode: bool) -> Result<()> {
    let retriever = retriever_for(config, &args.retrieval)?;
    let index_available = retriever.get_index().await.is_some();
    let settings = retriever.config().clone();

    let (context, hits) = if args.scores {
        let hits = retriever
            .search(&args.text, settings.top_k)
            .await
            .context("Query failed")?;
        (None, Some(hits))
    } else {
        let context = retriever
            .retrieve_context(&args.text, settings.top_k, settings.max_context_chars)
            .await;
        (Some(context), None)
    };

    output(
        &QueryOutput {
            query: args.text,
            index: settings.index_path,
            index_available,
            context,
            hits,
        },
        json_mode,
    );
    Ok(())
}
