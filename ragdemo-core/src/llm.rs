use std::sync::Arc;

use async_trait::async_trait;

use crate::LlmError;

/// A completion model: takes a fully rendered prompt and returns the generated text.
#[async_trait]
pub trait Llm: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<T> Llm for Arc<T>
where
    T: Llm + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}
