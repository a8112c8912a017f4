use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{
    ask_handler, health_handler, load_pdf_handler, load_text_handler, root_handler,
};
use crate::state::AppState;

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(root_handler))
        .route("/loadTextEmbeddings", get(load_text_handler))
        .route("/loadPdfEmbeddings", get(load_pdf_handler))
        .route("/ask", post(ask_handler))
        .route("/health", get(health_handler))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(trace_layer)
        .with_state(state)
}
