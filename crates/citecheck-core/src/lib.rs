use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

pub mod backend;
pub mod config_file;
pub mod key;
pub mod reconcile;

// Re-export for convenience
pub use backend::{BackendError, DocumentBackend, PlainTextBackend, read_source_list};
pub use key::{UNKNOWN_AUTHOR, is_plausible_year, normalize};
pub use reconcile::{encode_page_ranges, page_coverage, reconcile, uncited_pages};

/// Canonical `surname_year` key used to match citations across sources.
///
/// Two distinct works by authors sharing a surname and a year produce the same
/// key. Matching is intentionally this coarse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CitationKey(String);

impl CitationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CitationKey> for String {
    fn from(key: CitationKey) -> Self {
        key.0
    }
}

/// An author-year citation found on a 1-indexed page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PageCitation {
    pub key: CitationKey,
    pub page: usize,
}

/// A bracketed numeric citation (`[3]`, `[2, 5]`, `[4-6]`) as it appeared in the
/// text. Not resolved against any numbering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NumericCitation {
    pub text: String,
    pub page: usize,
}

/// One reconstructed entry from a document's references section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibliographyEntry {
    pub text: String,
    /// Lowercased primary-author surname. `None` sorts after every named entry.
    pub sort_key: Option<String>,
}

/// A citation key together with the sorted pages it was cited on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitedSource {
    pub key: CitationKey,
    pub pages: Vec<usize>,
}

impl CitedSource {
    pub fn first_page(&self) -> Option<usize> {
        self.pages.first().copied()
    }
}

/// Result of reconciling document citations against a source list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Source-list keys that occur in the document.
    pub matched: Vec<CitedSource>,
    /// Source-list keys never cited in the document.
    pub list_only: Vec<CitationKey>,
    /// Document citations with no source-list entry.
    pub doc_only: Vec<CitedSource>,
    /// Human-readable runs of pages with no citation of either style.
    pub uncited_ranges: Vec<String>,
}

/// Number of recognized citations on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCoverage {
    pub page: usize,
    pub author_year: usize,
    pub numeric: usize,
}

impl PageCoverage {
    pub fn is_cited(&self) -> bool {
        self.author_year > 0 || self.numeric > 0
    }
}

/// Everything one run produces, handed as a whole to the reporting layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub total_pages: usize,
    pub citations: BTreeSet<PageCitation>,
    pub numeric_citations: BTreeSet<NumericCitation>,
    pub source_keys: BTreeSet<CitationKey>,
    pub reconciliation: Reconciliation,
    pub coverage: Vec<PageCoverage>,
    /// `None` when bibliography extraction was not requested.
    pub bibliography: Option<Vec<String>>,
}
