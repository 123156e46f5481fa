//! Vector infrastructure components
//!
//! Text chunking and persistence of the index artifact.

pub mod chunker;
pub mod index_store;

pub use chunker::{chunk_text, clean_text, ChunkWindows, Chunker};
pub use index_store::{detect_format, manifest_path_for, IndexStore};
