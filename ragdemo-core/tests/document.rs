use std::collections::HashMap;

use ragdemo_core::{Chunk, ChunkError, Document, Value};
use serde_json::json;

fn chunk_metadata(source: &str, index: u64) -> HashMap<String, Value> {
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), json!(source));
    metadata.insert("chunk_index".to_string(), json!(index));
    metadata
}

#[test]
fn document_roundtrip() {
    let doc = Document::new("doc-1", "hello").with_metadata("source", "unit.txt");

    let json = serde_json::to_string(&doc).unwrap();
    let parsed: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(doc, parsed);
    assert_eq!(parsed.source(), Some("unit.txt"));
}

#[test]
fn chunk_id_combines_source_and_index() {
    let chunk = Chunk::new("some text", chunk_metadata("wsj.txt", 4)).unwrap();

    assert_eq!(chunk.id(), "wsj.txt#4");
    assert_eq!(chunk.text(), "some text");
    assert_eq!(chunk.metadata().get("source"), Some(&json!("wsj.txt")));
    assert_eq!(chunk.index(), 4);
}

#[test]
fn chunk_rejects_blank_text() {
    let err = Chunk::new("  \n", chunk_metadata("a", 0)).unwrap_err();
    assert_eq!(err, ChunkError::EmptyText);
}

#[test]
fn chunk_rejects_missing_source() {
    let mut metadata = chunk_metadata("a", 0);
    metadata.remove("source");

    let err = Chunk::new("text", metadata).unwrap_err();
    assert_eq!(err, ChunkError::MissingField("source"));
}

#[test]
fn chunk_rejects_missing_index() {
    let mut metadata = chunk_metadata("a", 0);
    metadata.remove("chunk_index");

    let err = Chunk::new("text", metadata).unwrap_err();
    assert_eq!(err, ChunkError::MissingField("chunk_index"));
}

#[test]
fn chunk_rejects_non_integer_index() {
    let mut metadata = chunk_metadata("a", 0);
    metadata.insert("chunk_index".to_string(), json!("zero"));

    let err = Chunk::new("text", metadata).unwrap_err();
    assert!(matches!(
        err,
        ChunkError::InvalidField {
            field: "chunk_index",
            ..
        }
    ));
}

#[test]
fn chunk_deserialization_runs_validation() {
    let valid = json!({"text": "body", "metadata": {"source": "s", "chunk_index": 1}});
    let chunk: Chunk = serde_json::from_value(valid).unwrap();
    assert_eq!(chunk.id(), "s#1");

    let invalid = json!({"text": "body", "metadata": {"chunk_index": 1}});
    let err = serde_json::from_value::<Chunk>(invalid).unwrap_err();
    assert!(err.to_string().contains("source"));
}
