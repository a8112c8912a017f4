use std::time::{Duration, Instant};

use ragdemo_core::{Llm, LlmError, OllamaOptions};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Completion client for Ollama's non-streaming `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    options: OllamaOptions,
    timeout: Duration,
    http: Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| LlmError::Request(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            options: OllamaOptions::default(),
            timeout: DEFAULT_TIMEOUT,
            http,
        })
    }

    pub fn with_options(mut self, options: OllamaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "options_unset")]
    options: &'a OllamaOptions,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[async_trait::async_trait]
impl Llm for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.options,
        };

        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let started = Instant::now();
        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| self.request_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: OllamaGenerateResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::InvalidResponse(err.to_string())
            }
        })?;

        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            eval_count = body.eval_count,
            "completion received"
        );

        Ok(body.response)
    }
}

fn options_unset(options: &&OllamaOptions) -> bool {
    options.is_empty()
}
