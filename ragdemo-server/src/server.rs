use std::net::SocketAddr;

use tokio::sync::watch;

use crate::error::ServerError;
use crate::router::build_router;
use crate::state::{AppState, SharedKnowledgeBase};

const DEFAULT_MAX_BODY_BYTES: usize = 1_048_576;

pub struct RagServer {
    addr: SocketAddr,
    max_body_bytes: usize,
    knowledge_base: SharedKnowledgeBase,
    shutdown_rx: watch::Receiver<bool>,
}

impl RagServer {
    #[must_use]
    pub fn new(
        addr: SocketAddr,
        knowledge_base: SharedKnowledgeBase,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        if addr.ip().is_unspecified() {
            tracing::warn!(%addr, "binding to all interfaces");
        }

        Self {
            addr,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            knowledge_base,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Serves until the shutdown channel flips to `true`, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server hits a fatal I/O error.
    pub async fn serve(self) -> Result<(), ServerError> {
        let router = build_router(AppState::new(self.knowledge_base), self.max_body_bytes);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServerError::Bind(self.addr.to_string(), e))?;
        tracing::info!("listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                tracing::info!("shutting down");
            })
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}
