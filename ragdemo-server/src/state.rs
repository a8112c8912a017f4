use std::sync::Arc;
use std::time::Instant;

use ragdemo_core::{Embedding, Llm};
use ragdemo_embeddings::OllamaEmbedding;
use ragdemo_llm::OllamaClient;
use ragdemo_rag::KnowledgeBase;
use ragdemo_retrieval::InMemoryVectorStore;

use crate::config::Config;
use crate::error::ServerError;

pub type DynEmbedding = Arc<dyn Embedding>;
pub type DynLlm = Arc<dyn Llm>;
pub type SharedKnowledgeBase = KnowledgeBase<DynEmbedding, InMemoryVectorStore, DynLlm>;

#[derive(Clone)]
pub struct AppState {
    pub knowledge_base: Arc<SharedKnowledgeBase>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(knowledge_base: SharedKnowledgeBase) -> Self {
        Self {
            knowledge_base: Arc::new(knowledge_base),
            started_at: Instant::now(),
        }
    }
}

/// Wires the Ollama clients, the splitter and an empty store from `config`.
pub fn build_knowledge_base(config: &Config) -> Result<SharedKnowledgeBase, ServerError> {
    let options = config.ollama_options();
    let timeout = config.request_timeout();

    let mut embedder = OllamaEmbedding::new(&config.ollama_url, &config.embedding_model)
        .with_options(options.clone())
        .with_timeout(timeout);
    if let Some(dimension) = config.embedding_dimension {
        embedder = embedder.with_dimension(dimension);
    }
    let llm = OllamaClient::new(&config.ollama_url, &config.llm_model)?
        .with_options(options)
        .with_timeout(timeout);

    let embedder: DynEmbedding = Arc::new(embedder);
    let llm: DynLlm = Arc::new(llm);
    let knowledge_base = KnowledgeBase::builder(embedder, InMemoryVectorStore::new(), llm)
        .text_path(&config.text_path)
        .pdf_path(&config.pdf_path)
        .splitter(config.splitter()?)
        .top_k(config.top_k)
        .retry(config.retry_policy())
        .build()?;

    tracing::info!(
        ollama_url = %config.ollama_url,
        llm_model = %config.llm_model,
        embedding_model = %config.embedding_model,
        top_k = config.top_k,
        "knowledge base configured"
    );
    Ok(knowledge_base)
}
