//! Text chunking
//!
//! Splits whitespace-normalized text into overlapping, fixed-size character
//! windows. Offsets are character offsets, not byte offsets.

use crate::domain::models::{ChunkWindow, ChunkingConfig, IndexEntry};

/// Collapse every whitespace run into a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lazily walk `text` in windows of `chunk_size` characters.
///
/// The iterator is finite and `Clone`; cloning it (or calling this again)
/// restarts the sequence. Windows whose text is blank are skipped, and the
/// walk stops after the first window that reaches the end of the text.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> ChunkWindows<'_> {
    ChunkWindows::new(text, ChunkingConfig::new(chunk_size, chunk_overlap))
}

/// Iterator over the chunk windows of a text.
#[derive(Debug, Clone)]
pub struct ChunkWindows<'a> {
    text: &'a str,
    /// Byte offset of every character plus a trailing `text.len()`
    boundaries: Vec<usize>,
    size: usize,
    step: usize,
    next_start: usize,
    finished: bool,
}

impl<'a> ChunkWindows<'a> {
    fn new(text: &'a str, config: ChunkingConfig) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        Self {
            text,
            boundaries,
            size: config.chunk_size,
            step: config.step(),
            next_start: 0,
            finished: config.chunk_size == 0,
        }
    }

    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }
}

impl<'a> Iterator for ChunkWindows<'a> {
    type Item = ChunkWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.char_len();
        while !self.finished {
            let start = self.next_start;
            if start >= len {
                self.finished = true;
                break;
            }

            let end = (start + self.size).min(len);
            self.next_start = start + self.step;
            if end == len {
                self.finished = true;
            }

            let text = &self.text[self.boundaries[start]..self.boundaries[end]];
            if !text.trim().is_empty() {
                return Some(ChunkWindow { start, end, text });
            }
        }
        None
    }
}

/// Chunker bound to one chunking configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub const fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Clean a raw document and turn it into index entries with sequential
    /// chunk ids starting at 0.
    pub fn chunk_document(&self, source: &str, raw: &str) -> Vec<IndexEntry> {
        let cleaned = clean_text(raw);
        chunk_text(&cleaned, self.config.chunk_size, self.config.chunk_overlap)
            .enumerate()
            .map(|(chunk_id, window)| IndexEntry::from_window(source, chunk_id, window))
            .collect()
    }
}
