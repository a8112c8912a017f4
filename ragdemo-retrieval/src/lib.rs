mod error;
mod hash_embedder;
mod in_memory;
mod indexer;
mod loader;
mod retriever;
mod splitter;

use std::path::Path;

use ragdemo_core::Chunk;

pub use error::{IngestionError, RetrievalError};
pub use hash_embedder::HashEmbedder;
pub use in_memory::{InMemoryVectorStore, VectorIndex};
pub use indexer::Indexer;
pub use loader::{load_document, DocumentKind, LoadError, PdfLoader, TextLoader, UnknownKind};
pub use retriever::Retriever;
pub use splitter::{
    RecursiveCharacterTextSplitter, RecursiveCharacterTextSplitterBuilder, SplitterConfigError,
    DEFAULT_SEPARATORS,
};

pub async fn load_and_split(
    path: &Path,
    kind: DocumentKind,
    splitter: &RecursiveCharacterTextSplitter,
) -> Result<Vec<Chunk>, IngestionError> {
    let document = load_document(path, kind).await?;
    Ok(splitter.split_document(&document)?)
}
