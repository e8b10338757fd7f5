use citecheck_core::{Analysis, CitedSource};
use citecheck_parsing::group_numeric_by_page;

/// Which part of the report a [`Section`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Matched,
    ListOnly,
    DocumentOnly,
    CitationFreePages,
    NumericCitations,
    Bibliography,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Matched => "Citations exist in both",
            Self::ListOnly => "List only",
            Self::DocumentOnly => "Document only",
            Self::CitationFreePages => "Citation-Free Pages",
            Self::NumericCitations => "IEEE-style Citations Found",
            Self::Bibliography => "Extracted Bibliography",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Matched => {
                "Entries from your source list with a matching citation \
                 (author's last name and year) in the document."
            }
            Self::ListOnly => {
                "Entries from your source list with no matching citation \
                 (author's last name and year) in the document."
            }
            Self::DocumentOnly => {
                "Citations found in the document with no corresponding entry in your source list."
            }
            Self::CitationFreePages => "Pages of the document where no citations were found.",
            Self::NumericCitations => {
                "Numerical citations found in the document, typically used in IEEE style."
            }
            Self::Bibliography => {
                "Entries extracted from the document's references section, sorted by primary author."
            }
        }
    }

    /// Noun following the count in the heading.
    fn unit(self) -> &'static str {
        match self {
            Self::CitationFreePages => "groups",
            Self::Bibliography => "entries",
            _ => "found",
        }
    }
}

/// One titled, counted list of report items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub count: usize,
    pub items: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind, items: Vec<String>) -> Self {
        Self {
            kind,
            count: items.len(),
            items,
        }
    }

    /// `Citations exist in both (2 found)`
    pub fn heading(&self) -> String {
        format!("{} ({} {})", self.kind.title(), self.count, self.kind.unit())
    }
}

/// Build the report sections in display order.
///
/// The bibliography section is present only when the analysis carries one.
pub fn sections(analysis: &Analysis) -> Vec<Section> {
    let rec = &analysis.reconciliation;

    let mut out = vec![
        Section::new(
            SectionKind::Matched,
            rec.matched.iter().map(cited_item).collect(),
        ),
        Section::new(
            SectionKind::ListOnly,
            rec.list_only.iter().map(|k| k.to_string()).collect(),
        ),
        Section::new(
            SectionKind::DocumentOnly,
            rec.doc_only.iter().map(cited_item).collect(),
        ),
        Section::new(SectionKind::CitationFreePages, rec.uncited_ranges.clone()),
    ];

    // Counted per citation, listed per page
    let grouped = group_numeric_by_page(&analysis.numeric_citations);
    out.push(Section {
        kind: SectionKind::NumericCitations,
        count: analysis.numeric_citations.len(),
        items: grouped
            .into_iter()
            .map(|(page, texts)| format!("[page {}] {}", page, texts.join(", ")))
            .collect(),
    });

    if let Some(entries) = &analysis.bibliography {
        out.push(Section::new(SectionKind::Bibliography, entries.clone()));
    }
    out
}

/// `[pages 2, 4] smith_2020`
fn cited_item(source: &CitedSource) -> String {
    format!("[{}] {}", page_label(&source.pages), source.key)
}

fn page_label(pages: &[usize]) -> String {
    let list = pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if pages.len() == 1 {
        format!("page {}", list)
    } else {
        format!("pages {}", list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citecheck_parsing::{AnalysisOptions, analyze};

    fn sample() -> Analysis {
        analyze(
            &["Work by Smith (2020) and [3].", "Nothing.", "Again (Smith, 2020), [1] [3]."],
            &["Smith, J. (2020). T.", "Jones, K. (2019). U."],
            &AnalysisOptions::default(),
        )
    }

    #[test]
    fn test_sections_order_and_counts() {
        let s = sections(&sample());
        let kinds: Vec<SectionKind> = s.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Matched,
                SectionKind::ListOnly,
                SectionKind::DocumentOnly,
                SectionKind::CitationFreePages,
                SectionKind::NumericCitations,
            ]
        );
        assert_eq!(s[0].items, vec!["[pages 1, 3] smith_2020"]);
        assert_eq!(s[1].items, vec!["jones_2019"]);
        assert!(s[2].items.is_empty());
        assert_eq!(s[3].items, vec!["page 2"]);
        assert_eq!(s[4].count, 3);
        assert_eq!(s[4].items, vec!["[page 1] [3]", "[page 3] [1], [3]"]);
    }

    #[test]
    fn test_headings() {
        let s = sections(&sample());
        assert_eq!(s[0].heading(), "Citations exist in both (1 found)");
        assert_eq!(s[3].heading(), "Citation-Free Pages (1 groups)");
    }

    #[test]
    fn test_bibliography_section_only_when_present() {
        let mut analysis = sample();
        analysis.bibliography = Some(vec!["Adams, B. (2001). Entry.".to_string()]);
        let s = sections(&analysis);
        assert_eq!(s.len(), 6);
        assert_eq!(s[5].heading(), "Extracted Bibliography (1 entries)");
    }

    #[test]
    fn test_single_page_label() {
        assert_eq!(page_label(&[4]), "page 4");
        assert_eq!(page_label(&[2, 4]), "pages 2, 4");
    }
}
