use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ragdemo_core::{Document, SOURCE_KEY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Text => "text",
            DocumentKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown document kind '{0}', expected 'text' or 'pdf'")]
pub struct UnknownKind(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(DocumentKind::Text),
            "pdf" => Ok(DocumentKind::Pdf),
            _ => Err(UnknownKind(value.to_string())),
        }
    }
}

fn document_for(path: &Path, kind: DocumentKind, content: String) -> Document {
    let source = path.to_string_lossy().to_string();
    Document::new(source.clone(), content)
        .with_metadata(SOURCE_KEY, source)
        .with_metadata("kind", kind.as_str())
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TextLoader;

impl TextLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(document_for(path, DocumentKind::Text, content))
    }
}

/// Extracts the text of every page of a PDF into a single document.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = extract_pdf_text(&bytes).map_err(|message| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(document_for(path, DocumentKind::Pdf, content))
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    // The decoder panics on some malformed inputs.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err("pdf decoder panicked on malformed input".to_string()),
    }
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_bytes: &[u8]) -> Result<String, String> {
    Err("pdf support is disabled, rebuild with the `pdf` feature".to_string())
}

/// Loads `path` on the blocking pool, dispatching on `kind`.
pub async fn load_document(path: &Path, kind: DocumentKind) -> Result<Document, LoadError> {
    let owned = path.to_path_buf();
    let task = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Text => TextLoader::new().load(&owned),
        DocumentKind::Pdf => PdfLoader::new().load(&owned),
    });

    let document = task.await.map_err(|err| LoadError::Parse {
        path: path.to_path_buf(),
        message: format!("loader task failed: {err}"),
    })??;

    tracing::debug!(
        source = %path.display(),
        kind = %kind,
        chars = document.content.chars().count(),
        "document loaded"
    );
    Ok(document)
}
