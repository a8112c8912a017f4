mod template;

pub use template::{PromptError, PromptTemplate};
