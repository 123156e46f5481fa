//! Services: index building, retrieval, and prompt augmentation

pub mod indexer;
pub mod prompting;
pub mod retriever;

pub use indexer::{
    build_entries, decode_text, discover_documents, IndexOutcome, IndexSummary, Indexer,
    IndexerOptions, SourceDocument,
};
pub use prompting::build_prompt;
pub use retriever::{assemble_context, IndexStatus, RagRetriever, RetrieverConfig};
