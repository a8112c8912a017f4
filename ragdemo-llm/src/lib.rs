mod ollama;

pub use ollama::OllamaClient;
pub use ragdemo_core::{Llm, LlmError};
