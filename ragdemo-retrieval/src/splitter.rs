use std::collections::VecDeque;

use ragdemo_core::{Chunk, ChunkError, Document, Value, CHUNK_INDEX_KEY, SOURCE_KEY};
use serde_json::json;
use thiserror::Error;

/// Paragraphs, then lines, then words, then characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterConfigError {
    #[error("chunk_size must be greater than zero")]
    ChunkSizeMustBeGreaterThanZero,
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
    #[error("at least one separator is required")]
    NoSeparators,
}

/// Splits text on an ordered list of separators, falling back to the next separator only for
/// pieces that are still longer than `chunk_size`.
///
/// Lengths are measured in characters. The first configured separator is a hard boundary:
/// pieces it produces at the top level are never merged back together. Pieces produced by
/// lower-priority separators are greedily re-joined into windows of at most `chunk_size`
/// characters that share about `chunk_overlap` characters with their predecessor.
///
/// With the default separators every blank-line paragraph becomes its own chunk, however short.
/// A document of many short paragraphs therefore yields many small chunks, and a small `top_k`
/// retrieves correspondingly little context. Put `"\n"` first to merge paragraphs up to
/// `chunk_size`.
#[derive(Clone, Debug)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct RecursiveCharacterTextSplitterBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveCharacterTextSplitterBuilder {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RecursiveCharacterTextSplitterBuilder {
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<RecursiveCharacterTextSplitter, SplitterConfigError> {
        if self.chunk_size == 0 {
            return Err(SplitterConfigError::ChunkSizeMustBeGreaterThanZero);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitterConfigError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                chunk_size: self.chunk_size,
            });
        }
        if self.separators.is_empty() {
            return Err(SplitterConfigError::NoSeparators);
        }

        Ok(RecursiveCharacterTextSplitter {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.separators,
        })
    }
}

impl RecursiveCharacterTextSplitter {
    pub fn builder() -> RecursiveCharacterTextSplitterBuilder {
        RecursiveCharacterTextSplitterBuilder::default()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        self.split_recursive(text, &self.separators, true)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    /// Splits one document into validated chunks that inherit its metadata.
    ///
    /// Each chunk gets `source`, `chunk_index` and, when the chunk text occurs verbatim in the
    /// document, a 1-based inclusive line span under `loc.lines`.
    pub fn split_document(&self, document: &Document) -> Result<Vec<Chunk>, ChunkError> {
        let content = &document.content;
        let source = document.source().unwrap_or(&document.id).to_string();

        let mut chunks = Vec::new();
        let mut search_from = 0usize;
        for (index, text) in self.split_text(content).into_iter().enumerate() {
            let mut metadata = document.metadata.clone();
            metadata.insert(SOURCE_KEY.to_string(), Value::from(source.clone()));
            metadata.insert(CHUNK_INDEX_KEY.to_string(), Value::from(index));

            if let Some(offset) = content[search_from..].find(text.as_str()) {
                let start = search_from + offset;
                let from = content[..start].matches('\n').count() + 1;
                let to = from + text.matches('\n').count();
                metadata.insert("loc".to_string(), json!({"lines": {"from": from, "to": to}}));
                search_from = start + text.chars().next().map_or(1, char::len_utf8);
            }

            chunks.push(Chunk::new(text, metadata)?);
        }
        Ok(chunks)
    }

    fn split_recursive(&self, text: &str, separators: &[String], top_level: bool) -> Vec<String> {
        let Some((index, separator)) = separators
            .iter()
            .enumerate()
            .find(|(_, separator)| separator.is_empty() || text.contains(separator.as_str()))
        else {
            return vec![text.to_string()];
        };
        let remaining = &separators[index + 1..];
        let hard_boundary = top_level && index == 0 && !separator.is_empty();

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(start, ch)| &text[start..start + ch.len_utf8()])
                .collect()
        } else {
            text.split(separator.as_str())
                .filter(|piece| !piece.trim().is_empty())
                .collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) <= self.chunk_size {
                if hard_boundary {
                    chunks.push(piece.to_string());
                } else {
                    pending.push(piece);
                }
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge_pieces(&pending, separator));
                pending.clear();
            }
            if remaining.is_empty() {
                // Nothing left to split on; the oversized piece stays whole.
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining, false));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge_pieces(&pending, separator));
        }
        chunks
    }

    fn merge_pieces(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let joined_len = |window: &VecDeque<&str>, total: usize, next: usize| {
            total + next + if window.is_empty() { 0 } else { separator_len }
        };

        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;
        for &piece in pieces {
            let len = char_len(piece);
            if !window.is_empty() && joined_len(&window, total, len) > self.chunk_size {
                merged.push(join(&window, separator));
                while total > self.chunk_overlap
                    || (total > 0 && joined_len(&window, total, len) > self.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    let dropped = char_len(front) + if window.is_empty() { 0 } else { separator_len };
                    total = total.saturating_sub(dropped);
                }
            }
            total = joined_len(&window, total, len);
            window.push_back(piece);
        }
        if !window.is_empty() {
            merged.push(join(&window, separator));
        }
        merged
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join(window: &VecDeque<&str>, separator: &str) -> String {
    window.iter().copied().collect::<Vec<_>>().join(separator)
}
