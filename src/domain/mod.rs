//! Domain layer for the RAG index
//!
//! Core models (chunks, the index aggregate, configuration) and the port
//! traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
