use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Page separator emitted by `pdftotext` and similar extractors.
const FORM_FEED: char = '\u{000C}';

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors recover plain text per page; citation recognition and
/// bibliography segmentation live in `citecheck_parsing`.
pub trait DocumentBackend: Send + Sync {
    /// Extract the text of every page, in page order. Index 0 is page 1.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

/// Backend for already-extracted UTF-8 text. Pages are separated by form feeds;
/// a file without any is treated as a single page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PlainTextBackend {
    pub fn new() -> Self {
        Self
    }

    /// Split already-loaded text into pages.
    pub fn split_pages(text: &str) -> Vec<String> {
        let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        // pdftotext terminates the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        pages
    }
}

impl DocumentBackend for PlainTextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let text = read_to_string(path)?;
        Ok(Self::split_pages(&text))
    }
}

/// Read a reference list, one logical entry per line.
pub fn read_source_list(path: &Path) -> Result<Vec<String>, BackendError> {
    let text = read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}

fn read_to_string(path: &Path) -> Result<String, BackendError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(BackendError::NotFound(path.to_path_buf())),
        Err(e) => Err(BackendError::Io(e)),
    }
}
