use regex::Regex;

use crate::bibliography::SegmentationStrategy;

/// Section headers that open a bibliography, matched case-insensitively as whole words.
pub const DEFAULT_BIBLIOGRAPHY_HEADERS: &[&str] = &[
    "References",
    "Bibliography",
    "Literature Cited",
    "Works Cited",
    "Publications",
];

/// Number of trailing pages searched for a bibliography.
pub const DEFAULT_WINDOW_PAGES: usize = 20;

/// Entries shorter than this (in characters) are discarded.
pub const DEFAULT_MIN_ENTRY_CHARS: usize = 20;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for citation extraction and bibliography segmentation.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── citations.rs ──
    /// Author-year pattern. Must define `author` and `year_paren` and/or `year_bare` groups.
    pub(crate) author_year_re: Option<Regex>,
    /// Bracketed numeric citation pattern.
    pub(crate) numeric_re: Option<Regex>,

    // ── bibliography.rs ──
    /// Header words that open the references section.
    pub(crate) bibliography_headers: ListOverride<String>,
    /// Full replacement for the header regex built from `bibliography_headers`.
    pub(crate) section_header_re: Option<Regex>,
    /// How many trailing pages to search for the references section.
    pub(crate) window_pages: usize,
    /// Minimum character length of a kept bibliography entry.
    pub(crate) min_entry_chars: usize,
    /// How the references section is split into entries.
    pub(crate) segmentation: SegmentationStrategy,

    // ── text_processing.rs ──
    /// Compound-word suffixes that should preserve the hyphen.
    pub(crate) compound_suffixes: ListOverride<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            author_year_re: None,
            numeric_re: None,
            bibliography_headers: ListOverride::Default,
            section_header_re: None,
            window_pages: DEFAULT_WINDOW_PAGES,
            min_entry_chars: DEFAULT_MIN_ENTRY_CHARS,
            segmentation: SegmentationStrategy::default(),
            compound_suffixes: ListOverride::Default,
        }
    }
}

impl ParsingConfig {
    pub fn window_pages(&self) -> usize {
        self.window_pages
    }

    pub fn min_entry_chars(&self) -> usize {
        self.min_entry_chars
    }

    pub fn segmentation(&self) -> SegmentationStrategy {
        self.segmentation
    }

    /// Resolved header vocabulary.
    pub fn bibliography_headers(&self) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_BIBLIOGRAPHY_HEADERS
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.bibliography_headers.resolve(&defaults)
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    author_year_re: Option<String>,
    numeric_re: Option<String>,
    bibliography_headers: ListOverride<String>,
    section_header_re: Option<String>,
    window_pages: Option<usize>,
    min_entry_chars: Option<usize>,
    segmentation: Option<SegmentationStrategy>,
    compound_suffixes: ListOverride<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Citation patterns ──

    pub fn author_year_regex(mut self, pattern: &str) -> Self {
        self.author_year_re = Some(pattern.to_string());
        self
    }

    pub fn numeric_regex(mut self, pattern: &str) -> Self {
        self.numeric_re = Some(pattern.to_string());
        self
    }

    // ── Section header ──

    pub fn section_header_regex(mut self, pattern: &str) -> Self {
        self.section_header_re = Some(pattern.to_string());
        self
    }

    pub fn set_bibliography_headers(mut self, headers: Vec<String>) -> Self {
        self.bibliography_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_bibliography_header(mut self, header: String) -> Self {
        match &mut self.bibliography_headers {
            ListOverride::Extend(v) => v.push(header),
            _ => self.bibliography_headers = ListOverride::Extend(vec![header]),
        }
        self
    }

    // ── Scalars ──

    pub fn window_pages(mut self, n: usize) -> Self {
        self.window_pages = Some(n);
        self
    }

    pub fn min_entry_chars(mut self, n: usize) -> Self {
        self.min_entry_chars = Some(n);
        self
    }

    pub fn segmentation(mut self, strategy: SegmentationStrategy) -> Self {
        self.segmentation = Some(strategy);
        self
    }

    // ── Compound suffixes ──

    pub fn set_compound_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.compound_suffixes = ListOverride::Replace(suffixes);
        self
    }

    pub fn add_compound_suffix(mut self, suffix: String) -> Self {
        match &mut self.compound_suffixes {
            ListOverride::Extend(v) => v.push(suffix),
            _ => self.compound_suffixes = ListOverride::Extend(vec![suffix]),
        }
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            author_year_re: compile(self.author_year_re)?,
            numeric_re: compile(self.numeric_re)?,
            bibliography_headers: self.bibliography_headers,
            section_header_re: compile(self.section_header_re)?,
            window_pages: self.window_pages.unwrap_or(DEFAULT_WINDOW_PAGES),
            min_entry_chars: self.min_entry_chars.unwrap_or(DEFAULT_MIN_ENTRY_CHARS),
            segmentation: self.segmentation.unwrap_or_default(),
            compound_suffixes: self.compound_suffixes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.window_pages, 20);
        assert_eq!(config.min_entry_chars, 20);
        assert_eq!(config.bibliography_headers().len(), 5);
        assert_eq!(config.segmentation(), SegmentationStrategy::HangingIndent);
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .window_pages(5)
            .min_entry_chars(30)
            .segmentation(SegmentationStrategy::LeadingCapital)
            .build()
            .unwrap();
        assert_eq!(config.window_pages(), 5);
        assert_eq!(config.min_entry_chars(), 30);
        assert_eq!(config.segmentation(), SegmentationStrategy::LeadingCapital);
    }

    #[test]
    fn test_builder_custom_regex() {
        let config = ParsingConfigBuilder::new()
            .section_header_regex(r"(?i)\bLiteratur\b")
            .build()
            .unwrap();
        assert!(config.section_header_re.is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new()
            .numeric_regex(r"[invalid")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_extend_headers() {
        let config = ParsingConfigBuilder::new()
            .add_bibliography_header("Literatur".to_string())
            .add_bibliography_header("Bibliografía".to_string())
            .build()
            .unwrap();
        let headers = config.bibliography_headers();
        assert_eq!(headers.len(), 7);
        assert_eq!(headers.last().map(String::as_str), Some("Bibliografía"));
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
