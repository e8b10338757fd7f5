use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use citecheck_core::{NumericCitation, PageCitation, is_plausible_year, normalize};

use crate::config::ParsingConfig;
use crate::text_processing::expand_ligatures;

/// Author-year citations: `Smith (2020)`, `(Smith, 2020)`, `Smith et al. 2020, pp. 4-6`.
static AUTHOR_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<author>\p{Lu}[\p{L}'\-]+(?:\s+\p{Lu}[\p{L}'\-]+)*)
        (?:\s+et\s+al\.?)?
        (?:
            \s*\(
            (?P<year_paren>(?:19|20)[0-9]{2})
            (?P<page_paren>,\s*pp?\.?\s*[0-9]+(?:[-–][0-9]+)?)?
            \)
        |
            (?:,\s*|\s+)
            (?P<year_bare>(?:19|20)[0-9]{2})
            (?P<page_bare>,\s*pp?\.?\s*[0-9]+(?:[-–][0-9]+)?)?
        )",
    )
    .unwrap()
});

/// Bracketed numeric citations: `[3]`, `[2, 5]`, `[4-6]`.
static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:[0-9]+(?:,\s*[0-9]+)*|[0-9]+[-–][0-9]+)\]").unwrap());

/// Citations found across a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCitations {
    pub author_year: BTreeSet<PageCitation>,
    pub numeric: BTreeSet<NumericCitation>,
}

/// Scans page text for author-year and numeric citations.
///
/// Each page is scanned on its own. A citation broken across a page boundary
/// is not reassembled.
#[derive(Debug, Clone, Default)]
pub struct CitationExtractor {
    config: ParsingConfig,
}

impl CitationExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Scan every page. `pages[0]` is page 1.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S]) -> ExtractedCitations {
        let mut found = ExtractedCitations::default();
        for (i, text) in pages.iter().enumerate() {
            self.scan_page(text.as_ref(), i + 1, &mut found);
        }
        tracing::debug!(
            pages = pages.len(),
            author_year = found.author_year.len(),
            numeric = found.numeric.len(),
            "citation extraction complete"
        );
        found
    }

    fn scan_page(&self, text: &str, page: usize, found: &mut ExtractedCitations) {
        let text = expand_ligatures(text);
        let author_year_re = self.config.author_year_re.as_ref().unwrap_or(&AUTHOR_YEAR_RE);
        let numeric_re = self.config.numeric_re.as_ref().unwrap_or(&NUMERIC_RE);

        for caps in author_year_re.captures_iter(&text) {
            let Some(author) = caps.name("author") else {
                continue;
            };
            let year = match (caps.name("year_paren"), caps.name("year_bare")) {
                (Some(y), _) => {
                    // "(2024)." is usually a version or protocol identifier, not a citation
                    let whole = caps.get(0).map_or(0, |m| m.end());
                    if text[whole..].starts_with('.') {
                        continue;
                    }
                    y.as_str()
                }
                (None, Some(y)) => y.as_str(),
                (None, None) => continue,
            };
            // custom patterns may capture any digit run
            if !is_plausible_year(year) {
                continue;
            }
            found.author_year.insert(PageCitation {
                key: normalize(author.as_str(), year),
                page,
            });
        }

        for m in numeric_re.find_iter(&text) {
            found.numeric.insert(NumericCitation {
                text: m.as_str().to_string(),
                page,
            });
        }
    }
}

/// Extract citations from `pages` with the default patterns.
pub fn extract_citations<S: AsRef<str>>(pages: &[S]) -> ExtractedCitations {
    CitationExtractor::new().extract(pages)
}

/// Group numeric citations by page, each page's texts sorted and deduplicated.
pub fn group_numeric_by_page(
    numeric: &BTreeSet<NumericCitation>,
) -> BTreeMap<usize, Vec<String>> {
    let mut grouped: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
    for n in numeric {
        grouped.entry(n.page).or_default().insert(n.text.as_str());
    }
    grouped
        .into_iter()
        .map(|(page, texts)| (page, texts.into_iter().map(str::to_string).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(found: &ExtractedCitations) -> Vec<(String, usize)> {
        found
            .author_year
            .iter()
            .map(|c| (c.key.to_string(), c.page))
            .collect()
    }

    fn numerics(found: &ExtractedCitations) -> Vec<(String, usize)> {
        found
            .numeric
            .iter()
            .map(|n| (n.text.clone(), n.page))
            .collect()
    }

    #[test]
    fn test_mixed_scenario() {
        let found = extract_citations(&["Recent work (Smith, 2020) confirms prior findings [3]."]);
        assert_eq!(keys(&found), vec![("smith_2020".to_string(), 1)]);
        assert_eq!(numerics(&found), vec![("[3]".to_string(), 1)]);
    }

    #[test]
    fn test_narrative_form() {
        let found = extract_citations(&["As shown by Smith (2020), things work."]);
        assert_eq!(keys(&found), vec![("smith_2020".to_string(), 1)]);
    }

    #[test]
    fn test_et_al_and_page_suffix() {
        let found = extract_citations(&[
            "Prior results (Jones et al., 2019, pp. 4-6) and Lee et al. (2018, p. 12) agree.",
        ]);
        assert_eq!(
            keys(&found),
            vec![
                ("jones_2019".to_string(), 1),
                ("lee_2018".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_period_after_paren_year_is_ignored() {
        let found = extract_citations(&["We implement Protocol (2024). It is fast."]);
        assert!(found.author_year.is_empty());
    }

    #[test]
    fn test_hyphen_and_apostrophe_names() {
        let found = extract_citations(&["(O'Brien, 2001) and (Smith-Jones, 1999)"]);
        assert_eq!(
            keys(&found),
            vec![
                ("o'brien_2001".to_string(), 1),
                ("smith-jones_1999".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_years_out_of_range_ignored() {
        let found = extract_citations(&["Smith (1850) and Brown (2150) wrote."]);
        assert!(found.author_year.is_empty());
    }

    #[test]
    fn test_numeric_forms() {
        let found = extract_citations(&["See [2, 5], [4-6] and [7–9] but not [a] or [1,]."]);
        let texts: Vec<String> = numerics(&found).into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["[2, 5]", "[4-6]", "[7–9]"]);
    }

    #[test]
    fn test_pages_tagged_and_deduplicated() {
        let pages = vec![
            "Smith (2020) and again Smith (2020). [1] [1]".to_string(),
            "Nothing here.".to_string(),
            "Later, (Smith, 2020).".to_string(),
        ];
        let found = extract_citations(&pages);
        assert_eq!(
            keys(&found),
            vec![("smith_2020".to_string(), 1), ("smith_2020".to_string(), 3)]
        );
        assert_eq!(numerics(&found), vec![("[1]".to_string(), 1)]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let pages = ["(Smith, 2020) [3]", "Jones (2019) [4-6]"];
        assert_eq!(extract_citations(&pages), extract_citations(&pages));
    }

    #[test]
    fn test_ligature_expanded_before_scan() {
        let found = extract_citations(&["(Griﬃths, 2010)"]);
        assert_eq!(keys(&found), vec![("griffiths_2010".to_string(), 1)]);
    }

    #[test]
    fn test_custom_numeric_regex() {
        let config = crate::ParsingConfigBuilder::new()
            .numeric_regex(r"\{[0-9]+\}")
            .build()
            .unwrap();
        let found = CitationExtractor::with_config(config).extract(&["see {4} not [5]"]);
        assert_eq!(numerics(&found), vec![("{4}".to_string(), 1)]);
    }

    #[test]
    fn test_custom_author_year_regex_checks_year() {
        let config = crate::ParsingConfigBuilder::new()
            .author_year_regex(r"(?P<author>\p{Lu}\p{L}+) (?P<year_bare>[0-9]{3,4})")
            .build()
            .unwrap();
        let found = CitationExtractor::with_config(config)
            .extract(&["Smith 1850, Brown 202 and Jones 2001 agree."]);
        assert_eq!(keys(&found), vec![("jones_2001".to_string(), 1)]);
    }

    #[test]
    fn test_group_numeric_by_page() {
        let found = extract_citations(&["[3] [1]", "", "[2, 5] [1]"]);
        let grouped = group_numeric_by_page(&found.numeric);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&1], vec!["[1]", "[3]"]);
        assert_eq!(grouped[&3], vec!["[1]", "[2, 5]"]);
    }
}
