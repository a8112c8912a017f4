use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ragdemo_core::{
    Chunk, Embedding, EmbeddingError, RetryPolicy, StoreError, Value, VectorStore,
};
use ragdemo_retrieval::{HashEmbedder, InMemoryVectorStore, Indexer, RetrievalError};

fn chunk(text: &str, index: u64) -> Chunk {
    let metadata = HashMap::from([
        ("source".to_string(), Value::from("indexer-test")),
        ("chunk_index".to_string(), Value::from(index)),
    ]);
    Chunk::new(text, metadata).unwrap()
}

/// Fails `embed` for one chunk text until its failure budget runs out.
struct FlakyEmbedder {
    failing_text: &'static str,
    failures_left: AtomicUsize,
    embedded: Arc<Mutex<Vec<String>>>,
    inner: HashEmbedder,
}

impl FlakyEmbedder {
    fn new(failing_text: &'static str, failures: usize) -> (Self, Arc<Mutex<Vec<String>>>) {
        let embedded = Arc::new(Mutex::new(Vec::new()));
        let embedder = Self {
            failing_text,
            failures_left: AtomicUsize::new(failures),
            embedded: Arc::clone(&embedded),
            inner: HashEmbedder::new(4),
        };
        (embedder, embedded)
    }
}

#[async_trait]
impl Embedding for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embedded.lock().unwrap().push(text.to_string());
        if text == self.failing_text && self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(EmbeddingError::Timeout(Duration::from_millis(5)));
        }
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        panic!("indexer embeds chunks one at a time");
    }
}

/// Returns a vector as long as the input text.
struct RaggedEmbedder;

#[async_trait]
impl Embedding for RaggedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0; text.len()])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| vec![1.0; text.len()]).collect())
    }
}

#[tokio::test]
async fn indexer_embeds_and_loads_chunks() {
    let embedder = HashEmbedder::new(8);
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(embedder.clone(), store.clone());

    let count = indexer
        .index(vec![chunk("first chunk", 0), chunk("second chunk", 1)])
        .await
        .unwrap();

    assert_eq!(count, 2);
    let query = embedder.embed("first chunk").await.unwrap();
    let results = store.query(&query, 1).await.unwrap();
    assert_eq!(results[0].chunk.id(), "indexer-test#0");
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn indexer_retries_only_the_failing_chunk() {
    let (embedder, embedded) = FlakyEmbedder::new("second", 1);
    let store = InMemoryVectorStore::new();
    let policy = RetryPolicy {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
    };
    let indexer = Indexer::new(embedder, store.clone()).with_retry(policy);

    let count = indexer
        .index(vec![chunk("first", 0), chunk("second", 1), chunk("third", 2)])
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        *embedded.lock().unwrap(),
        vec!["first", "second", "second", "third"]
    );
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn indexer_failure_leaves_store_untouched() {
    let store = InMemoryVectorStore::new();
    Indexer::new(HashEmbedder::new(4), store.clone())
        .index(vec![chunk("previous", 0)])
        .await
        .unwrap();

    let (embedder, embedded) = FlakyEmbedder::new("broken", 5);
    let error = Indexer::new(embedder, store.clone())
        .index(vec![chunk("replacement", 0), chunk("broken", 1), chunk("never", 2)])
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RetrievalError::Embedding(EmbeddingError::Timeout(_))
    ));
    assert_eq!(*embedded.lock().unwrap(), vec!["replacement", "broken"]);
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.chunks().len(), 1);
    assert_eq!(snapshot.chunks()[0].text(), "previous");
}

#[tokio::test]
async fn indexer_rejects_mixed_embedding_dimensions() {
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(RaggedEmbedder, store.clone());

    let error = indexer
        .index(vec![chunk("a", 0), chunk("bb", 1)])
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RetrievalError::Store(StoreError::DimensionMismatch {
            expected: 1,
            got: 2
        })
    ));
    assert!(!store.is_loaded().await);
}
