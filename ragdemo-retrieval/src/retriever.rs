use ragdemo_core::{retry_with_backoff, Embedding, EmbeddingError, RetryPolicy, ScoredChunk, VectorStore};

use crate::RetrievalError;

pub struct Retriever<E, S> {
    embedder: E,
    store: S,
    retry: RetryPolicy,
}

impl<E, S> Retriever<E, S>
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

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let embedding = retry_with_backoff(&self.retry, EmbeddingError::is_retryable, || {
            self.embedder.embed(query)
        })
        .await?;
        let results = self.store.query(&embedding, top_k).await?;
        Ok(results)
    }
}
