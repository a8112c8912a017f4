use ragdemo_core::{ChunkError, EmbeddingError, LlmError, StoreError};
use ragdemo_prompt::PromptError;
use ragdemo_retrieval::{IngestionError, LoadError, RetrievalError, SplitterConfigError};

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("knowledge base has not been loaded")]
    NotLoaded,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("chunking failed: {0}")]
    Chunk(#[from] ChunkError),
    #[error("invalid splitter configuration: {0}")]
    Splitter(#[from] SplitterConfigError),
    #[error(transparent)]
    Embedding(EmbeddingError),
    #[error("vector store error: {0}")]
    Store(StoreError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),
}

impl From<StoreError> for RagError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotLoaded => RagError::NotLoaded,
            other => RagError::Store(other),
        }
    }
}

impl From<EmbeddingError> for RagError {
    fn from(error: EmbeddingError) -> Self {
        RagError::Embedding(error)
    }
}

impl From<RetrievalError> for RagError {
    fn from(error: RetrievalError) -> Self {
        match error {
            RetrievalError::Embedding(error) => error.into(),
            RetrievalError::Store(error) => error.into(),
        }
    }
}

impl From<IngestionError> for RagError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::Load(error) => error.into(),
            IngestionError::Chunk(error) => error.into(),
        }
    }
}
