use std::time::Duration;

use ragdemo_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::InvalidResponse(message) => {
                EmbeddingError::InvalidResponse(message)
            }
            EmbeddingProviderError::Request(message) => EmbeddingError::Provider(message),
            EmbeddingProviderError::Timeout(duration) => EmbeddingError::Timeout(duration),
            EmbeddingProviderError::Status { status: 429, .. } => {
                EmbeddingError::RateLimited { retry_after: None }
            }
            EmbeddingProviderError::Status { status, message } if status >= 500 => {
                EmbeddingError::Provider(format!("status {status}: {message}"))
            }
            EmbeddingProviderError::Status { status, message } => {
                EmbeddingError::InvalidResponse(format!("status {status}: {message}"))
            }
        }
    }
}
