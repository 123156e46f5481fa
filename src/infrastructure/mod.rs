//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Chunking and index artifact storage
//!
//! Embedding service clients live in `crate::adapters`.

pub mod config;
pub mod logging;
pub mod vector;
