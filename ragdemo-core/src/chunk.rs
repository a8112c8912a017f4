use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Value;

pub const SOURCE_KEY: &str = "source";
pub const CHUNK_INDEX_KEY: &str = "chunk_index";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk text is empty")]
    EmptyText,
    #[error("chunk metadata is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("chunk metadata field '{field}' has the wrong type: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// A bounded slice of a document's text, the unit that gets embedded and retrieved.
///
/// Chunks can only be built through [`Chunk::new`], which requires a non-empty text and a
/// metadata map carrying a string `source` and an integer `chunk_index`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Chunk {
    id: String,
    text: String,
    metadata: HashMap<String, Value>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: HashMap<String, Value>) -> Result<Self, ChunkError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChunkError::EmptyText);
        }

        let source = match metadata.get(SOURCE_KEY) {
            None => return Err(ChunkError::MissingField(SOURCE_KEY)),
            Some(value) => value.as_str().ok_or(ChunkError::InvalidField {
                field: SOURCE_KEY,
                expected: "string",
            })?,
        };
        let index = match metadata.get(CHUNK_INDEX_KEY) {
            None => return Err(ChunkError::MissingField(CHUNK_INDEX_KEY)),
            Some(value) => value.as_u64().ok_or(ChunkError::InvalidField {
                field: CHUNK_INDEX_KEY,
                expected: "unsigned integer",
            })?,
        };

        Ok(Self {
            id: format!("{source}#{index}"),
            text,
            metadata,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    pub fn index(&self) -> u64 {
        self.metadata
            .get(CHUNK_INDEX_KEY)
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawChunk {
    text: String,
    metadata: HashMap<String, Value>,
}

impl<'de> Deserialize<'de> for Chunk {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawChunk::deserialize(deserializer)?;
        Chunk::new(raw.text, raw.metadata).map_err(serde::de::Error::custom)
    }
}
