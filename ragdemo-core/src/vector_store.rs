use async_trait::async_trait;

use crate::{Chunk, StoreError};

#[derive(Clone, Debug)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Replaces the whole store with `chunks`, paired index-wise with `embeddings`.
    async fn load(&self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<(), StoreError>;

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, StoreError>;

    async fn is_loaded(&self) -> bool;

    async fn len(&self) -> usize;
}
