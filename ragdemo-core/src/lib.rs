//! Shared data model and service traits for ragdemo.

mod chunk;
mod document;
mod embedding;
mod error;
mod llm;
mod options;
mod retry;
mod value;
mod vector_store;

pub use chunk::{Chunk, ChunkError, CHUNK_INDEX_KEY, SOURCE_KEY};
pub use document::Document;
pub use embedding::Embedding;
pub use error::{EmbeddingError, LlmError, StoreError};
pub use llm::Llm;
pub use options::OllamaOptions;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use value::Value;
pub use vector_store::{ScoredChunk, VectorStore};
