use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use ragdemo_core::{OllamaOptions, RetryPolicy};
use ragdemo_retrieval::{RecursiveCharacterTextSplitter, SplitterConfigError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("top_k must be greater than zero")]
    ZeroTopK,
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
    #[error("invalid splitter configuration: {0}")]
    Splitter(#[from] SplitterConfigError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server settings, read from flags with environment fallbacks.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "ragdemo-server",
    version,
    about = "Answer questions about a local text or PDF file with Ollama"
)]
pub struct Config {
    #[arg(long, env = "RAGDEMO_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "RAGDEMO_PORT", default_value_t = 3002)]
    pub port: u16,

    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    #[arg(long, env = "RAGDEMO_LLM_MODEL", default_value = "gemma2:27b")]
    pub llm_model: String,

    #[arg(long, env = "RAGDEMO_EMBEDDING_MODEL", default_value = "gemma2:27b")]
    pub embedding_model: String,

    /// Expected embedding length; responses of any other length are rejected.
    #[arg(long, env = "RAGDEMO_EMBEDDING_DIMENSION")]
    pub embedding_dimension: Option<usize>,

    #[arg(long, env = "OLLAMA_NUM_THREAD", default_value_t = 6)]
    pub num_thread: u32,

    #[arg(long, env = "OLLAMA_NUM_GPU", default_value_t = 1)]
    pub num_gpu: u32,

    #[arg(long, env = "OLLAMA_USE_MMAP", default_value_t = true, action = ArgAction::Set)]
    pub use_mmap: bool,

    #[arg(long, env = "RAGDEMO_TEXT_PATH", default_value = "data/wsj.txt")]
    pub text_path: PathBuf,

    #[arg(long, env = "RAGDEMO_PDF_PATH", default_value = "data/burak-pdf.pdf")]
    pub pdf_path: PathBuf,

    #[arg(long, env = "RAGDEMO_CHUNK_SIZE", default_value_t = 1000)]
    pub chunk_size: usize,

    #[arg(long, env = "RAGDEMO_CHUNK_OVERLAP", default_value_t = 50)]
    pub chunk_overlap: usize,

    /// Comma separated, highest priority first. `\n`, `\t`, `\\` and `\,` are unescaped.
    #[arg(long, env = "RAGDEMO_SEPARATORS", default_value = r"\n\n,\n, ,")]
    pub separators: String,

    #[arg(long, env = "RAGDEMO_TOP_K", default_value_t = 3)]
    pub top_k: usize,

    #[arg(long, env = "RAGDEMO_REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,

    /// Extra attempts for transient embedding and completion failures.
    #[arg(long, env = "RAGDEMO_MAX_RETRIES", default_value_t = 2)]
    pub max_retries: usize,

    #[arg(long, env = "RAGDEMO_MAX_BODY_BYTES", default_value_t = 1_048_576)]
    pub max_body_bytes: usize,

    #[arg(long, env = "RAGDEMO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        self.addr()?;
        self.splitter()?;
        Ok(())
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))
    }

    pub fn separator_list(&self) -> Vec<String> {
        parse_separators(&self.separators)
    }

    pub fn splitter(&self) -> Result<RecursiveCharacterTextSplitter, ConfigError> {
        Ok(RecursiveCharacterTextSplitter::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .separators(self.separator_list())
            .build()?)
    }

    pub fn ollama_options(&self) -> OllamaOptions {
        OllamaOptions {
            num_thread: Some(self.num_thread),
            num_gpu: Some(self.num_gpu),
            use_mmap: Some(self.use_mmap),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries.saturating_add(1))
    }
}

/// Splits on unescaped commas. A trailing comma yields the empty (character-level) separator.
pub fn parse_separators(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut separators = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => current.push('\n'),
                Some('t') => current.push('\t'),
                Some('\\') => current.push('\\'),
                Some(',') => current.push(','),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => separators.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    separators.push(current);
    separators
}
