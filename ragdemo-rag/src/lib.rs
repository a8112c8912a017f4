//! Question answering over documents loaded into an in-memory vector store.

mod error;
mod knowledge_base;
mod pipeline;

pub use error::RagError;
pub use knowledge_base::{KnowledgeBase, KnowledgeBaseBuilder, LoadReport};
pub use pipeline::{AnswerPipeline, RagAnswer, DEFAULT_TOP_K, RAG_PROMPT};
