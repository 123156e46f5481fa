//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::build::BuildArgs;
use super::commands::inspect::InspectArgs;
use super::commands::prompt::PromptArgs;
use super::commands::query::QueryArgs;

#[derive(Parser, Debug)]
#[command(name = "robot-rag")]
#[command(about = "Build and query a retrieval index over a text corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .robot-rag/config.yaml and local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed, and index a corpus directory
    Build(BuildArgs),

    /// Retrieve context for a query
    Query(QueryArgs),

    /// Print a question augmented with retrieved context
    Prompt(PromptArgs),

    /// Summarize an index artifact
    Inspect(InspectArgs),
}
