//! `prompt`: print a question augmented with retrieved context.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::build_prompt;

use super::{retriever_for, RetrievalArgs};

#[derive(Args, Debug, Clone)]
pub struct PromptArgs {
    /// The user question
    pub question: String,
    #[command(flatten)]
    pub retrieval: RetrievalArgs,
}

#[derive(Debug, serde::Serialize)]
pub struct PromptOutput {
    pub question: String,
    pub context_chars: usize,
    pub prompt: String,
}

impl CommandOutput for PromptOutput {
    fn to_human(&self) -> String {
        self.prompt.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: PromptArgs, config: Config, json_mode: bool) -> Result<()> {
    let retriever = retriever_for(config, &args.retrieval)?;
    let context = retriever.context_for(&args.question).await;
    if context.is_empty() {
        tracing::info!("no context retrieved, prompt left unchanged");
    }

    output(
        &PromptOutput {
            context_chars: context.chars().count(),
            prompt: build_prompt(&args.question, &context),
            question: args.question,
        },
        json_mode,
    );
    Ok(())
}
