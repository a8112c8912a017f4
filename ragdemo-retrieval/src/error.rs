use ragdemo_core::{ChunkError, EmbeddingError, StoreError};
use thiserror::Error;

use crate::LoadError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("chunking failed: {0}")]
    Chunk(#[from] ChunkError),
}
