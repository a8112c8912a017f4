use std::time::Instant;

use ragdemo_core::{retry_with_backoff, Chunk, Embedding, EmbeddingError, RetryPolicy, VectorStore};

use crate::RetrievalError;

/// Embeds a full set of chunks and swaps them into the store in one step.
pub struct Indexer<E, S> {
    embedder: E,
    store: S,
    retry: RetryPolicy,
}

impl<E, S> Indexer<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self {
            embedder,
            store,
            retry: RetryPolicy::no_retry(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the store's contents with `chunks`. Returns the number of chunks stored.
    ///
    /// Each chunk is embedded on its own, so a transient failure retries only that chunk.
    /// Nothing is written if any embedding call fails, so the previous contents stay live.
    pub async fn index(&self, chunks: Vec<Chunk>) -> Result<usize, RetrievalError> {
        let started = Instant::now();
        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let embedding = retry_with_backoff(&self.retry, EmbeddingError::is_retryable, || {
                self.embedder.embed(chunk.text())
            })
            .await?;
            embeddings.push(embedding);
        }

        let count = chunks.len();
        self.store.load(chunks, embeddings).await?;
        tracing::debug!(
            chunks = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chunks indexed"
        );
        Ok(count)
    }
}
