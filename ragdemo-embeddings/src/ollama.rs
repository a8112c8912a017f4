use std::time::Duration;

use async_trait::async_trait;
use ragdemo_core::{Embedding, EmbeddingError, OllamaOptions};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::EmbeddingProviderError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct OllamaEmbedding {
    base_url: String,
    model: String,
    dimension: Option<usize>,
    options: OllamaOptions,
    timeout: Duration,
    http: Client,
}

impl OllamaEmbedding {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimension: None,
            options: OllamaOptions::default(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_options(mut self, options: OllamaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rejects responses whose vector length differs from `dimension`.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    fn request_error(&self, err: reqwest::Error) -> EmbeddingProviderError {
        if err.is_timeout() {
            EmbeddingProviderError::Timeout(self.timeout)
        } else {
            EmbeddingProviderError::Request(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "options_unset")]
    options: &'a OllamaOptions,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedding for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));
        let req = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
            options: &self.options,
        };
        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&req)
            .send()
            .await
            .map_err(|err| self.request_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let response: OllamaEmbeddingResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                EmbeddingProviderError::Timeout(self.timeout)
            } else {
                EmbeddingProviderError::InvalidResponse(err.to_string())
            }
        })?;

        if response.embedding.is_empty() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "model '{}' returned an empty embedding",
                self.model
            ))
            .into());
        }

        if let Some(expected) = self.dimension {
            if response.embedding.len() != expected {
                return Err(EmbeddingProviderError::InvalidResponse(format!(
                    "expected embedding dimension {}, got {}",
                    expected,
                    response.embedding.len()
                ))
                .into());
            }
        }

        Ok(response.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            tracing::trace!(index, total = texts.len(), "embedding text");
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

fn options_unset(options: &&OllamaOptions) -> bool {
    options.is_empty()
}
