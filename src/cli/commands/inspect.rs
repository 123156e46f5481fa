//! `inspect`: summarize an index artifact.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use console::style;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ArtifactFormat, Config, IndexManifest, RagIndex};
use crate::infrastructure::vector::{detect_format, manifest_path_for, IndexStore};

const NORM_TOLERANCE: f32 = 1e-4;

#[derive(Args, Debug, Clone, Default)]
pub struct InspectArgs {
    /// Index artifact to inspect
    #[arg(short, long)]
    pub index: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct InspectOutput {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    pub model: String,
    pub entries: usize,
    pub dimension: usize,
    pub norms_consistent: bool,
    pub sources: Vec<(String, usize)>,
    pub built_at: Option<DateTime<Utc>>,
}

impl InspectOutput {
    pub fn from_index(
        path: PathBuf,
        format: ArtifactFormat,
        index: &RagIndex,
        manifest: Option<&IndexManifest>,
    ) -> Self {
        let mut sources: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in index.entries() {
            *sources.entry(entry.source.as_str()).or_default() += 1;
        }

        Self {
            path,
            format,
            model: index.model().to_string(),
            entries: index.len(),
            dimension: index.dimension().unwrap_or(0),
            norms_consistent: index.verify_norms(NORM_TOLERANCE),
            sources: sources.into_iter().map(|(s, n)| (s.to_string(), n)).collect(),
            built_at: manifest.map(|m| m.built_at),
        }
    }
}

impl CommandOutput for InspectOutput {
    fn to_human(&self) -> String {
        let norms = if self.norms_consistent {
            style("consistent").green().to_string()
        } else {
            style("MISMATCH").red().bold().to_string()
        };

        let mut lines = vec![
            style("Index").bold().underlined().to_string(),
            format!("  Path:      {}", self.path.display()),
            format!("  Format:    {}", self.format),
            format!("  Model:     {}", self.model),
            format!("  Entries:   {}", self.entries),
            format!("  Dimension: {}", self.dimension),
            format!("  Norms:     {norms}"),
        ];
        if let Some(built_at) = self.built_at {
            lines.push(format!("  Built at:  {}", built_at.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push(style("Sources").bold().underlined().to_string());
            lines.push(TableFormatter::new().format_sources(&self.sources));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn read_manifest(path: &std::path::Path) -> Option<IndexManifest> {
    let bytes = std::fs::read(manifest_path_for(path)).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unreadable manifest");
            None
        }
    }
}

pub async fn execute(args: InspectArgs, config: Config, json_mode: bool) -> Result<()> {
    let path = args.index.unwrap_or_else(|| config.resolved_index_path());

    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read index at {}", path.display()))?;
    let format = detect_format(&bytes)?;
    let index = IndexStore::load_with_default_model(&path, &config.embed_model)
        .context("Failed to load index")?;
    let manifest = read_manifest(&path);

    output(
        &InspectOutput::from_index(path, format, &index, manifest.as_ref()),
        json_mode,
    );
    Ok(())
}
