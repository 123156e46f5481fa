//! Table output formatting for CLI commands
//!
//! Renders ranked hits and per-source chunk counts using comfy-table.

use crate::domain::models::ScoredEntry;
use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format ranked hits, best first
    pub fn format_hits(&self, hits: &[ScoredEntry]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("#"),
            header("Score"),
            header("Source"),
            header("Chunk"),
            header("Text"),
        ]);

        for (rank, hit) in hits.iter().enumerate() {
            let score = format!("{:.4}", hit.score);
            let score_cell = if self.use_colors {
                Cell::new(score).fg(score_color(hit.score))
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                score_cell.set_alignment(CellAlignment::Right),
                Cell::new(&hit.entry.source),
                Cell::new(format!("{} [{}..{})", hit.entry.chunk_id, hit.entry.start, hit.entry.end)),
                Cell::new(truncate(&hit.entry.text, 60)),
            ]);
        }

        table.to_string()
    }

    /// Format `(source, chunk count)` pairs
    pub fn format_sources(&self, sources: &[(String, usize)]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Source"), header("Chunks")]);

        for (source, chunks) in sources {
            table.add_row(vec![
                Cell::new(source),
                Cell::new(chunks).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(title: &str) -> Cell {
    Cell::new(title).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn score_color(score: f32) -> Color {
    if score >= 0.75 {
        Color::Green
    } else if score >= 0.4 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}
