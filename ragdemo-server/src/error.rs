use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ragdemo_core::{EmbeddingError, LlmError};
use ragdemo_rag::RagError;
use ragdemo_retrieval::LoadError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::handlers::{MessageResponse, NOT_LOADED_MESSAGE};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build llm client: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to build knowledge base: {0}")]
    Rag(#[from] RagError),
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// A [`RagError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub RagError);

impl From<RagError> for ApiError {
    fn from(error: RagError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RagError::NotLoaded => StatusCode::OK,
            RagError::Load(LoadError::Io { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            RagError::Load(LoadError::Parse { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            RagError::Embedding(EmbeddingError::Timeout(_)) | RagError::Llm(LlmError::Timeout(_)) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            RagError::Embedding(_) | RagError::Llm(_) => StatusCode::BAD_GATEWAY,
            RagError::Chunk(_) | RagError::Splitter(_) | RagError::Store(_) | RagError::Prompt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self.0, RagError::NotLoaded) {
            let body = MessageResponse {
                message: NOT_LOADED_MESSAGE,
            };
            return (StatusCode::OK, Json(body)).into_response();
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
