use std::cmp::Ordering;
use std::sync::Arc;

use ragdemo_core::{Chunk, ScoredChunk, StoreError, VectorStore};
use tokio::sync::RwLock;

/// An immutable set of chunks and their embeddings, all of one dimension.
#[derive(Debug, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

impl VectorIndex {
    pub fn build(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self, StoreError> {
        if chunks.len() != embeddings.len() {
            return Err(StoreError::LengthMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let mut dimension = None;
        for (chunk, embedding) in chunks.iter().zip(&embeddings) {
            if embedding.is_empty() {
                return Err(StoreError::EmptyEmbedding(chunk.id().to_string()));
            }
            match dimension {
                Some(expected) if expected != embedding.len() => {
                    return Err(StoreError::DimensionMismatch {
                        expected,
                        got: embedding.len(),
                    });
                }
                None => dimension = Some(embedding.len()),
                _ => {}
            }
        }

        Ok(Self {
            chunks,
            embeddings,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Ranks every chunk by cosine similarity to `query`, best first.
    ///
    /// Equal scores keep their load order and NaN scores sort last. `top_k` is clamped to the
    /// index size.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, StoreError> {
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.dimension {
            if expected != query.len() {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    got: query.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(idx, embedding)| {
                let score = cosine_similarity(query, embedding);
                (idx, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();

        // sort_by is stable, so ties stay in load order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| ScoredChunk {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect())
    }
}

/// Holds the single live [`VectorIndex`].
///
/// `load` builds the new index before taking the write lock, so a concurrent `query` sees either
/// the previous index or the new one in full. Queries clone the `Arc` and score outside the lock.
#[derive(Clone, Default)]
pub struct InMemoryVectorStore {
    current: Arc<RwLock<Option<Arc<VectorIndex>>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.current.read().await.clone()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn load(&self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<(), StoreError> {
        let index = Arc::new(VectorIndex::build(chunks, embeddings)?);
        let count = index.len();
        let dimension = index.dimension();

        let previous = self.current.write().await.replace(index);
        tracing::info!(
            chunks = count,
            dimension,
            replaced = previous.is_some(),
            "vector store loaded"
        );
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, StoreError> {
        let index = self.snapshot().await.ok_or(StoreError::NotLoaded)?;
        index.search(embedding, top_k)
    }

    async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn len(&self) -> usize {
        self.current
            .read()
            .await
            .as_ref()
            .map_or(0, |index| index.len())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
