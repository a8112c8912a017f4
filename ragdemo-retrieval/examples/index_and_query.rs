use std::path::PathBuf;

use ragdemo_retrieval::{
    load_and_split, DocumentKind, HashEmbedder, InMemoryVectorStore, Indexer,
    RecursiveCharacterTextSplitter, Retriever,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/wsj.txt"));
    let question = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "What happened to interest rates?".to_string());

    let splitter = RecursiveCharacterTextSplitter::builder().build()?;
    let chunks = load_and_split(&path, DocumentKind::Text, &splitter).await?;

    let embedder = HashEmbedder::new(64);
    let store = InMemoryVectorStore::new();
    let count = Indexer::new(embedder.clone(), store.clone())
        .index(chunks)
        .await?;
    println!("indexed {count} chunks from {}", path.display());

    let retriever = Retriever::new(embedder, store);
    for result in retriever.retrieve(&question, 3).await? {
        println!("{:.3} {}", result.score, result.chunk.id());
    }
    Ok(())
}
