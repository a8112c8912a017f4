use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ragdemo_retrieval::DocumentKind;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) const LOADED_MESSAGE: &str = "Text embeddings loaded successfully.";
pub(crate) const NOT_LOADED_MESSAGE: &str = "Text embeddings not loaded yet.";

#[derive(Deserialize)]
pub(crate) struct AskRequest {
    pub question: String,
}

#[derive(Serialize)]
pub(crate) struct AskResponse {
    pub answer: String,
}

#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    loaded: bool,
    chunks: usize,
    uptime_secs: u64,
}

pub(crate) async fn root_handler() -> &'static str {
    "Hello Hono!"
}

pub(crate) async fn load_text_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    load(&state, DocumentKind::Text).await
}

pub(crate) async fn load_pdf_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    load(&state, DocumentKind::Pdf).await
}

async fn load(state: &AppState, kind: DocumentKind) -> Result<Json<MessageResponse>, ApiError> {
    let report = state.knowledge_base.load(kind).await?;
    tracing::info!(
        kind = %report.kind,
        source = %report.source.display(),
        chunks = report.chunks,
        "embeddings loaded"
    );
    Ok(Json(MessageResponse {
        message: LOADED_MESSAGE,
    }))
}

#[tracing::instrument(skip(state, request))]
pub(crate) async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    tracing::debug!(question_chars = request.question.chars().count(), "processing question");

    let answer = state.knowledge_base.ask(&request.question).await?;
    tracing::info!(
        sources = ?answer.sources.iter().map(|s| s.chunk.id()).collect::<Vec<_>>(),
        "question answered"
    );
    Ok(Json(AskResponse {
        answer: answer.answer,
    }))
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let knowledge_base = &state.knowledge_base;
    Json(HealthResponse {
        status: "ok",
        loaded: knowledge_base.is_loaded().await,
        chunks: knowledge_base.len().await,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
