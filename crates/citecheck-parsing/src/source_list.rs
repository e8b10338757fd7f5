use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use citecheck_core::{CitationKey, UNKNOWN_AUTHOR, normalize};

/// Leading author group, then the first 19xx/20xx year anywhere after it.
static SOURCE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?:
            (?P<author>\p{Lu}[\p{L}'\-]*(?:\s+\p{Lu}[\p{L}'\-]+)*)
            (?:\s+et\s+al\.?)?
            (?:(?:,\s*|\s+and\s+|\s*&\s*)\p{Lu}[\p{L}'\-]*(?:\s+\p{Lu}\.?)*)*
        )?
        .*?
        \(?(?P<year>(?:19|20)[0-9]{2})\)?",
    )
    .unwrap()
});

/// `1.`, `12)` or `[3]` list numbering at the start of a line.
static LIST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\[[0-9]{1,3}\]|[0-9]{1,3}[.)])\s*").unwrap());

/// Parse one reference-list line into a citation key.
///
/// Returns `None` when the line has no plausible year; such lines are dropped
/// silently by [`parse_source_list`].
pub fn parse_source_line(line: &str) -> Option<CitationKey> {
    let line = line.trim_start_matches('\u{FEFF}').trim();
    if line.is_empty() {
        return None;
    }
    let numbering = LIST_NUMBER_RE.find(line).map_or(0, |m| m.end());
    let line = &line[numbering..];

    let caps = SOURCE_LINE_RE.captures(line)?;
    let year = caps.name("year")?.as_str();
    let author = match caps.name("author") {
        Some(a) => a.as_str().to_string(),
        None => fallback_author(line),
    };
    Some(normalize(&author, year))
}

/// First whitespace-delimited token with surrounding non-letters trimmed.
fn fallback_author(line: &str) -> String {
    line.split_whitespace()
        .next()
        .map(|t| t.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

/// Parse every line of a reference list into a deduplicated key set.
pub fn parse_source_list<S: AsRef<str>>(lines: &[S]) -> BTreeSet<CitationKey> {
    let mut keys = BTreeSet::new();
    let mut skipped = 0usize;
    for line in lines {
        let line = line.as_ref();
        match parse_source_line(line) {
            Some(key) => {
                keys.insert(key);
            }
            None if line.trim().is_empty() => {}
            None => {
                skipped += 1;
                tracing::trace!(line, "source line has no year, skipped");
            }
        }
    }
    tracing::debug!(keys = keys.len(), skipped, "source list parsed");
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(line: &str) -> Option<String> {
        parse_source_line(line).map(String::from)
    }

    #[test]
    fn test_apa_line() {
        assert_eq!(
            key("Smith, J. (2020). Title of paper.").as_deref(),
            Some("smith_2020")
        );
    }

    #[test]
    fn test_co_authors_reduced_to_first() {
        assert_eq!(
            key("Jones, A., & Lee, B. (2019). Joint work.").as_deref(),
            Some("jones_2019")
        );
        assert_eq!(
            key("Brown and Green 2005, Some Title").as_deref(),
            Some("brown_2005")
        );
        assert_eq!(
            key("Miller et al. (2011) A big collaboration.").as_deref(),
            Some("miller_2011")
        );
    }

    #[test]
    fn test_accented_multi_word_author() {
        assert_eq!(
            key("García Márquez, G. (1985). El amor.").as_deref(),
            Some("garcía márquez_1985")
        );
    }

    #[test]
    fn test_unparenthesized_year() {
        assert_eq!(
            key("Adams, B. 2001. Some book. Publisher.").as_deref(),
            Some("adams_2001")
        );
    }

    #[test]
    fn test_list_numbering_stripped() {
        assert_eq!(key("1. Adams, B. (2001). Title.").as_deref(), Some("adams_2001"));
        assert_eq!(key("[12] Adams, B. (2001). Title.").as_deref(), Some("adams_2001"));
        assert_eq!(key("3) Adams, B. (2001). Title.").as_deref(), Some("adams_2001"));
    }

    #[test]
    fn test_fallback_author() {
        assert_eq!(
            key("smith, j. 2020. lowercase entry").as_deref(),
            Some("smith_2020")
        );
        assert_eq!(
            key("(2018) Anonymous report").as_deref(),
            Some("unknown_2018")
        );
    }

    #[test]
    fn test_no_year_is_skipped() {
        assert_eq!(key("Smith, J. Title without a date."), None);
        assert_eq!(key("Smith, J. (1850). Too old."), None);
        assert_eq!(key("   "), None);
    }

    #[test]
    fn test_parse_source_list_deduplicates() {
        let lines = [
            "\u{FEFF}Smith, J. (2020). Title of paper.",
            "",
            "Smith, J. (2020). Same key, different work.",
            "Undated entry.",
            "Jones, A. (2019). Another.",
        ];
        let keys: Vec<String> = parse_source_list(&lines)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys, vec!["jones_2019", "smith_2020"]);
    }
}
