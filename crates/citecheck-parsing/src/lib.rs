use std::path::Path;

use thiserror::Error;

pub mod bibliography;
pub mod citations;
pub mod config;
pub mod source_list;
pub mod text_processing;

pub use bibliography::{
    SegmentationStrategy, extract_bibliography, extract_bibliography_with_config,
    find_bibliography_section, primary_author_key, segment_entries, sort_entries,
};
pub use citations::{CitationExtractor, ExtractedCitations, extract_citations, group_numeric_by_page};
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use source_list::{parse_source_line, parse_source_list};
// Re-export domain types from core (canonical definitions live there)
pub use citecheck_core::{
    Analysis, BackendError, CitationKey, CitedSource, DocumentBackend, NumericCitation,
    PageCitation, Reconciliation,
};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("cannot read document: {0}")]
    Document(#[source] BackendError),
    #[error("cannot read source list: {0}")]
    SourceList(#[source] BackendError),
}

/// Knobs for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub parsing: ParsingConfig,
    /// Also reconstruct the document's own references section.
    pub extract_bibliography: bool,
}

/// Analyze already-loaded document pages against reference-list lines.
///
/// Pipeline:
/// 1. Scan every page for author-year and numeric citations
/// 2. Parse the source list into keys
/// 3. Reconcile the two key sets and compute citation-free pages
/// 4. Optionally extract the document's bibliography
pub fn analyze<P, L>(pages: &[P], source_lines: &[L], options: &AnalysisOptions) -> Analysis
where
    P: AsRef<str>,
    L: AsRef<str>,
{
    let total_pages = pages.len();
    let found = CitationExtractor::with_config(options.parsing.clone()).extract(pages);
    let source_keys = parse_source_list(source_lines);

    let reconciliation = citecheck_core::reconcile(
        &found.author_year,
        &found.numeric,
        &source_keys,
        total_pages,
    );
    let coverage = citecheck_core::page_coverage(total_pages, &found.author_year, &found.numeric);

    let bibliography = options
        .extract_bibliography
        .then(|| extract_bibliography_with_config(pages, &options.parsing));

    tracing::info!(
        pages = total_pages,
        matched = reconciliation.matched.len(),
        list_only = reconciliation.list_only.len(),
        doc_only = reconciliation.doc_only.len(),
        bibliography = bibliography.as_ref().map(Vec::len),
        "analysis complete"
    );

    Analysis {
        total_pages,
        citations: found.author_year,
        numeric_citations: found.numeric,
        source_keys,
        reconciliation,
        coverage,
        bibliography,
    }
}

/// Load a document through `backend` and a source list from disk, then
/// [`analyze`] them. Either file being unreadable aborts the run.
pub fn run(
    document_path: &Path,
    source_list_path: &Path,
    backend: &dyn DocumentBackend,
    options: &AnalysisOptions,
) -> Result<Analysis, CheckError> {
    let pages = backend
        .extract_pages(document_path)
        .map_err(CheckError::Document)?;
    tracing::info!(path = %document_path.display(), pages = pages.len(), "document loaded");

    let source_lines =
        citecheck_core::read_source_list(source_list_path).map_err(CheckError::SourceList)?;
    tracing::info!(
        path = %source_list_path.display(),
        lines = source_lines.len(),
        "source list loaded"
    );

    Ok(analyze(&pages, &source_lines, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_reconciles_document_and_list() {
        let pages = [
            "Intro.",
            "Work by Smith (2020) argued this.",
            "Nothing.",
            "Again see (Smith, 2020) and (Brown, 2018).",
        ];
        let sources = ["Smith, J. (2020). T.", "Jones, K. (2019). U."];
        let analysis = analyze(&pages, &sources, &AnalysisOptions::default());

        assert_eq!(analysis.total_pages, 4);
        let matched = &analysis.reconciliation.matched;
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].key.as_str(), "smith_2020");
        assert_eq!(matched[0].pages, vec![2, 4]);
        assert_eq!(
            analysis
                .reconciliation
                .list_only
                .iter()
                .map(CitationKey::as_str)
                .collect::<Vec<_>>(),
            vec!["jones_2019"]
        );
        assert_eq!(analysis.reconciliation.doc_only[0].key.as_str(), "brown_2018");
        assert_eq!(analysis.reconciliation.uncited_ranges, vec!["page 1", "page 3"]);
        assert_eq!(analysis.coverage.len(), 4);
        assert!(analysis.bibliography.is_none());
    }

    #[test]
    fn test_analyze_empty_inputs() {
        let pages: [&str; 0] = [];
        let sources: [&str; 0] = [];
        let analysis = analyze(&pages, &sources, &AnalysisOptions::default());
        assert_eq!(analysis.total_pages, 0);
        assert_eq!(analysis.reconciliation, Reconciliation::default());
    }

    #[test]
    fn test_analyze_with_bibliography() {
        let pages = [
            "Body text citing Adams (2001).",
            "References\nAdams, B. (2001). A sufficiently long entry title.",
        ];
        let options = AnalysisOptions {
            extract_bibliography: true,
            ..AnalysisOptions::default()
        };
        let analysis = analyze(&pages, &["Adams, B. (2001). Title."], &options);
        let bibliography = analysis.bibliography.unwrap_or_default();
        assert_eq!(
            bibliography,
            vec!["Adams, B. (2001). A sufficiently long entry title."]
        );
    }
}
