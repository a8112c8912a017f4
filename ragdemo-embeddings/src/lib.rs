mod error;

#[cfg(feature = "ollama")]
mod ollama;

pub use error::EmbeddingProviderError;

#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbedding;
