use serde::{Deserialize, Serialize};

/// Runtime hints forwarded untouched to the Ollama `options` object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_thread: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_gpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_mmap: Option<bool>,
}

impl OllamaOptions {
    pub fn is_empty(&self) -> bool {
        self.num_thread.is_none() && self.num_gpu.is_none() && self.use_mmap.is_none()
    }
}
