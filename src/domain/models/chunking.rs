//! Text chunking domain models
//!
//! Models for splitting cleaned documents into overlapping character windows
//! and for the chunk records persisted in an index artifact.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target size of each chunk in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Overlap actually applied when chunking.
    ///
    /// An overlap that would stall the window (`overlap >= size`) is clamped
    /// to a fifth of the chunk size.
    pub const fn effective_overlap(&self) -> usize {
        if self.chunk_overlap >= self.chunk_size {
            self.chunk_size / 5
        } else {
            self.chunk_overlap
        }
    }

    /// Distance between the starts of consecutive windows, never zero.
    pub const fn step(&self) -> usize {
        let step = self.chunk_size - self.effective_overlap();
        if step == 0 {
            1
        } else {
            step
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::new(900, 180)
    }
}

/// One window produced by the chunker, borrowing from the cleaned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow<'a> {
    /// Character offset of the first character
    pub start: usize,
    /// Character offset one past the last character
    pub end: usize,
    /// The window text (untrimmed)
    pub text: &'a str,
}

/// A chunk stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The chunk text
    pub text: String,

    /// Path of the origin document, relative to the data directory
    pub source: String,

    /// Position of this chunk within its source (0-based, contiguous)
    pub chunk_id: usize,

    /// Start character offset in the cleaned source text
    pub start: usize,

    /// Exclusive end character offset
    pub end: usize,
}

impl IndexEntry {
    pub fn from_window(source: impl Into<String>, chunk_id: usize, window: ChunkWindow<'_>) -> Self {
        Self {
            text: window.text.to_string(),
            source: source.into(),
            chunk_id,
            start: window.start,
            end: window.end,
        }
    }

    /// Get a preview of the text (first 80 characters)
    pub fn preview(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.chars().count() <= 80 {
            trimmed.to_string()
        } else {
            let head: String = trimmed.chars().take(80).collect();
            format!("{head}...")
        }
    }
}
