//! HTTP front end for ragdemo: load a document, then ask questions about it.

pub mod config;
mod error;
mod handlers;
mod router;
mod server;
mod state;
pub mod telemetry;

pub use config::{Config, ConfigError, LogFormat};
pub use error::{ApiError, ServerError};
pub use router::build_router;
pub use server::RagServer;
pub use state::{build_knowledge_base, AppState, DynEmbedding, DynLlm, SharedKnowledgeBase};
