use std::collections::HashMap;
use std::time::Instant;

use ragdemo_core::{
    retry_with_backoff, Embedding, Llm, LlmError, RetryPolicy, ScoredChunk, Value, VectorStore,
};
use ragdemo_prompt::PromptTemplate;
use ragdemo_retrieval::Retriever;

use crate::RagError;

pub const DEFAULT_TOP_K: usize = 3;

/// Question-answering prompt. `{context}` receives the retrieved chunks and `{question}` the
/// user's question.
pub const RAG_PROMPT: &str = "You are a helpful AI assistant. Answer the following question based only on the provided context. If the answer cannot be derived from the context, say \"I don't have enough information to answer that question.\" If I like your results I'll tip you $1000!

Context: {context}

Question: {question}

Answer: 
  ";

#[derive(Clone, Debug)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

/// Embed the question, retrieve the nearest chunks, render the prompt, complete.
pub struct AnswerPipeline<E, S, L> {
    retriever: Retriever<E, S>,
    llm: L,
    prompt: PromptTemplate,
    top_k: usize,
    retry: RetryPolicy,
}

impl<E, S, L> AnswerPipeline<E, S, L>
where
    E: Embedding,
    S: VectorStore,
    L: Llm,
{
    pub fn new(embedder: E, store: S, llm: L) -> Result<Self, RagError> {
        Ok(Self {
            retriever: Retriever::new(embedder, store),
            llm,
            prompt: PromptTemplate::new(RAG_PROMPT)?,
            top_k: DEFAULT_TOP_K,
            retry: RetryPolicy::no_retry(),
        })
    }

    pub fn with_prompt(mut self, template: &str) -> Result<Self, RagError> {
        self.prompt = PromptTemplate::new(template)?;
        Ok(self)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retriever = self.retriever.with_retry(retry);
        self.retry = retry;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn store(&self) -> &S {
        self.retriever.store()
    }

    /// Answers `question` from the loaded chunks.
    ///
    /// Returns [`RagError::NotLoaded`] without calling any model when nothing has been loaded.
    #[tracing::instrument(skip(self, question), fields(top_k = self.top_k))]
    pub async fn answer(&self, question: &str) -> Result<RagAnswer, RagError> {
        if !self.store().is_loaded().await {
            return Err(RagError::NotLoaded);
        }

        let started = Instant::now();
        let sources = self.retriever.retrieve(question, self.top_k).await?;
        let context = sources
            .iter()
            .map(|source| source.chunk.text())
            .collect::<Vec<_>>()
            .join("\n\n");

        let vars = HashMap::from([
            ("context".to_string(), Value::from(context)),
            ("question".to_string(), Value::from(question)),
        ]);
        let prompt = self.prompt.render(&vars)?;

        let answer = retry_with_backoff(&self.retry, LlmError::is_retryable, || {
            self.llm.generate(&prompt)
        })
        .await?;

        tracing::debug!(
            sources = sources.len(),
            prompt_chars = prompt.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "question answered"
        );
        Ok(RagAnswer { answer, sources })
    }
}
