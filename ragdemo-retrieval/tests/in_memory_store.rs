use std::collections::HashMap;

use ragdemo_core::{Chunk, StoreError, Value, VectorStore};
use ragdemo_retrieval::{InMemoryVectorStore, VectorIndex};

fn chunk(text: &str, index: u64) -> Chunk {
    let metadata = HashMap::from([
        ("source".to_string(), Value::from("store-test")),
        ("chunk_index".to_string(), Value::from(index)),
    ]);
    Chunk::new(text, metadata).unwrap()
}

#[tokio::test]
async fn in_memory_query_before_load_is_not_loaded() {
    let store = InMemoryVectorStore::new();

    assert!(!store.is_loaded().await);
    assert_eq!(store.len().await, 0);
    let error = store.query(&[1.0, 0.0], 3).await.unwrap_err();
    assert_eq!(error, StoreError::NotLoaded);
}

#[tokio::test]
async fn in_memory_ranks_by_cosine_similarity() {
    let store = InMemoryVectorStore::new();
    store
        .load(
            vec![chunk("orthogonal", 0), chunk("diagonal", 1), chunk("aligned", 2)],
            vec![vec![0.0, 1.0], vec![0.7, 0.7], vec![2.0, 0.0]],
        )
        .await
        .unwrap();

    let results = store.query(&[1.0, 0.0], 3).await.unwrap();
    let texts: Vec<&str> = results.iter().map(|r| r.chunk.text()).collect();

    assert_eq!(texts, vec!["aligned", "diagonal", "orthogonal"]);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!(results[2].score.abs() < 1e-6);
}

#[tokio::test]
async fn in_memory_clamps_top_k_to_store_size() {
    let store = InMemoryVectorStore::new();
    store
        .load(
            vec![chunk("a", 0), chunk("b", 1)],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .await
        .unwrap();

    assert_eq!(store.query(&[1.0, 1.0], 10).await.unwrap().len(), 2);
    assert!(store.query(&[1.0, 1.0], 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn in_memory_ties_keep_load_order() {
    let store = InMemoryVectorStore::new();
    store
        .load(
            vec![chunk("first", 0), chunk("second", 1), chunk("third", 2)],
            vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .await
        .unwrap();

    let results = store.query(&[1.0, 1.0], 3).await.unwrap();
    let texts: Vec<&str> = results.iter().map(|r| r.chunk.text()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn in_memory_load_replaces_previous_contents() {
    let store = InMemoryVectorStore::new();
    store
        .load(vec![chunk("old", 0)], vec![vec![1.0, 0.0]])
        .await
        .unwrap();
    store
        .load(
            vec![chunk("new one", 0), chunk("new two", 1)],
            vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
        )
        .await
        .unwrap();

    assert_eq!(store.len().await, 2);
    let results = store.query(&[0.0, 1.0, 0.0], 5).await.unwrap();
    assert!(results.iter().all(|r| r.chunk.text().starts_with("new")));
}

#[tokio::test]
async fn in_memory_failed_load_keeps_previous_contents() {
    let store = InMemoryVectorStore::new();
    store
        .load(vec![chunk("kept", 0)], vec![vec![1.0, 0.0]])
        .await
        .unwrap();

    let error = store
        .load(
            vec![chunk("a", 0), chunk("b", 1)],
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        )
        .await
        .unwrap_err();

    assert_eq!(error, StoreError::DimensionMismatch { expected: 2, got: 3 });
    let results = store.query(&[1.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].chunk.text(), "kept");
}

#[tokio::test]
async fn in_memory_rejects_query_of_wrong_dimension() {
    let store = InMemoryVectorStore::new();
    store
        .load(vec![chunk("a", 0)], vec![vec![1.0, 0.0]])
        .await
        .unwrap();

    let error = store.query(&[1.0, 0.0, 0.0], 1).await.unwrap_err();
    assert_eq!(error, StoreError::DimensionMismatch { expected: 2, got: 3 });
}

#[tokio::test]
async fn in_memory_empty_load_is_loaded_but_empty() {
    let store = InMemoryVectorStore::new();
    store.load(Vec::new(), Vec::new()).await.unwrap();

    assert!(store.is_loaded().await);
    assert!(store.query(&[1.0], 3).await.unwrap().is_empty());
}

#[test]
fn vector_index_rejects_mismatched_lengths_and_empty_embeddings() {
    let error = VectorIndex::build(vec![chunk("a", 0)], Vec::new()).unwrap_err();
    assert_eq!(
        error,
        StoreError::LengthMismatch {
            chunks: 1,
            embeddings: 0
        }
    );

    let error = VectorIndex::build(vec![chunk("a", 0)], vec![Vec::new()]).unwrap_err();
    assert_eq!(error, StoreError::EmptyEmbedding("store-test#0".to_string()));
}

#[test]
fn vector_index_sorts_nan_scores_last() {
    let index = VectorIndex::build(
        vec![chunk("broken", 0), chunk("fine", 1)],
        vec![vec![f32::NAN, 1.0], vec![1.0, 0.0]],
    )
    .unwrap();

    let results = index.search(&[1.0, 0.0], 2).unwrap();
    assert_eq!(results[0].chunk.text(), "fine");
    assert_eq!(results[1].chunk.text(), "broken");
    assert_eq!(index.dimension(), Some(2));
}
