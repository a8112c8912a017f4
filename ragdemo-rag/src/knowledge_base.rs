use std::path::{Path, PathBuf};
use std::time::Instant;

use ragdemo_core::{Embedding, Llm, RetryPolicy, VectorStore};
use ragdemo_retrieval::{load_and_split, DocumentKind, Indexer, RecursiveCharacterTextSplitter};
use tokio::sync::Mutex;

use crate::{AnswerPipeline, RagAnswer, RagError, DEFAULT_TOP_K};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub kind: DocumentKind,
    pub source: PathBuf,
    pub chunks: usize,
}

/// The documents the service can answer from, plus the one live vector store.
///
/// Loads replace the store wholesale and are serialized, so the last completed load wins.
/// Questions run concurrently with loads and see either the old or the new contents.
pub struct KnowledgeBase<E, S, L> {
    text_path: PathBuf,
    pdf_path: PathBuf,
    splitter: RecursiveCharacterTextSplitter,
    indexer: Indexer<E, S>,
    pipeline: AnswerPipeline<E, S, L>,
    load_lock: Mutex<()>,
}

pub struct KnowledgeBaseBuilder<E, S, L> {
    embedder: E,
    store: S,
    llm: L,
    text_path: PathBuf,
    pdf_path: PathBuf,
    splitter: Option<RecursiveCharacterTextSplitter>,
    top_k: usize,
    retry: RetryPolicy,
}

impl<E, S, L> KnowledgeBase<E, S, L>
where
    E: Embedding + Clone,
    S: VectorStore + Clone,
    L: Llm,
{
    pub fn builder(embedder: E, store: S, llm: L) -> KnowledgeBaseBuilder<E, S, L> {
        KnowledgeBaseBuilder {
            embedder,
            store,
            llm,
            text_path: PathBuf::from("data/wsj.txt"),
            pdf_path: PathBuf::from("data/burak-pdf.pdf"),
            splitter: None,
            top_k: DEFAULT_TOP_K,
            retry: RetryPolicy::no_retry(),
        }
    }

    pub fn path_for(&self, kind: DocumentKind) -> &Path {
        match kind {
            DocumentKind::Text => &self.text_path,
            DocumentKind::Pdf => &self.pdf_path,
        }
    }

    /// Loads the configured file for `kind` and makes it the only content of the store.
    ///
    /// On any failure the previous contents stay live.
    #[tracing::instrument(skip(self), fields(source = %self.path_for(kind).display()))]
    pub async fn load(&self, kind: DocumentKind) -> Result<LoadReport, RagError> {
        let _guard = self.load_lock.lock().await;
        let started = Instant::now();
        let path = self.path_for(kind);

        let chunks = load_and_split(path, kind, &self.splitter).await?;
        let chunks = self.indexer.index(chunks).await?;

        tracing::info!(
            chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "knowledge base loaded"
        );
        Ok(LoadReport {
            kind,
            source: path.to_path_buf(),
            chunks,
        })
    }

    pub async fn ask(&self, question: &str) -> Result<RagAnswer, RagError> {
        self.pipeline.answer(question).await
    }

    pub async fn is_loaded(&self) -> bool {
        self.pipeline.store().is_loaded().await
    }

    pub async fn len(&self) -> usize {
        self.pipeline.store().len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E, S, L> KnowledgeBaseBuilder<E, S, L>
where
    E: Embedding + Clone,
    S: VectorStore + Clone,
    L: Llm,
{
    pub fn text_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.text_path = path.into();
        self
    }

    pub fn pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf_path = path.into();
        self
    }

    pub fn splitter(mut self, splitter: RecursiveCharacterTextSplitter) -> Self {
        self.splitter = Some(splitter);
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<KnowledgeBase<E, S, L>, RagError> {
        let splitter = match self.splitter {
            Some(splitter) => splitter,
            None => RecursiveCharacterTextSplitter::builder().build()?,
        };
        let indexer =
            Indexer::new(self.embedder.clone(), self.store.clone()).with_retry(self.retry);
        let pipeline = AnswerPipeline::new(self.embedder, self.store, self.llm)?
            .with_top_k(self.top_k)
            .with_retry(self.retry);

        Ok(KnowledgeBase {
            text_path: self.text_path,
            pdf_path: self.pdf_path,
            splitter,
            indexer,
            pipeline,
            load_lock: Mutex::new(()),
        })
    }
}
