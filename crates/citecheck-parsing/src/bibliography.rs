use once_cell::sync::Lazy;
use regex::Regex;

use citecheck_core::BibliographyEntry;

use crate::config::ParsingConfig;
use crate::text_processing::normalize_entry_text;

/// Columns a tab counts for when measuring indentation.
const TAB_WIDTH: usize = 4;

/// How a references section is split into entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SegmentationStrategy {
    /// A line indented no deeper than the line before it opens an entry; a
    /// deeper one continues the open entry.
    #[default]
    HangingIndent,
    /// Indentation is ignored: a line starting with a capitalized word
    /// (optionally after `N.` or `[N]` numbering) opens an entry. Useful for
    /// extractors that drop leading whitespace.
    LeadingCapital,
}

/// Locate the references section in the trailing pages of a document.
///
/// The last `window_pages` pages are joined and searched for the first header
/// word (References, Bibliography, Literature Cited, Works Cited, Publications).
/// Returns the text after the header, or an empty string if there is none.
pub fn find_bibliography_section<S: AsRef<str>>(pages: &[S]) -> String {
    find_bibliography_section_with_config(pages, &ParsingConfig::default())
}

/// Config-aware version of [`find_bibliography_section`].
pub fn find_bibliography_section_with_config<S: AsRef<str>>(
    pages: &[S],
    config: &ParsingConfig,
) -> String {
    let start = pages.len().saturating_sub(config.window_pages);
    let window = pages[start..]
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let built;
    let header_re = match config.section_header_re.as_ref() {
        Some(re) => Some(re),
        None => {
            built = header_regex(&config.bibliography_headers());
            built.as_ref()
        }
    };

    match header_re.and_then(|re| re.find(&window)) {
        Some(m) => {
            tracing::debug!(
                header = m.as_str(),
                first_page = start + 1,
                "bibliography header found"
            );
            window[m.end()..].to_string()
        }
        None => {
            tracing::debug!(
                window_pages = pages.len() - start,
                "no bibliography header found"
            );
            String::new()
        }
    }
}

/// Case-insensitive whole-word alternation of `headers`; inner spaces match any whitespace.
fn header_regex(headers: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = headers
        .iter()
        .map(|h| {
            h.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|h| !h.is_empty())
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
}

/// Split a references section into entries.
pub fn segment_entries(section: &str) -> Vec<BibliographyEntry> {
    segment_entries_with_config(section, &ParsingConfig::default())
}

/// Config-aware version of [`segment_entries`].
pub fn segment_entries_with_config(section: &str, config: &ParsingConfig) -> Vec<BibliographyEntry> {
    static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,4}$").unwrap());

    let lines: Vec<(usize, &str)> = section
        .lines()
        .filter(|l| {
            let t = l.trim();
            !t.is_empty() && !PAGE_NUMBER_RE.is_match(t)
        })
        .map(|l| (indentation(l), l))
        .collect();

    let strategy = config.segmentation;
    let groups = match strategy {
        SegmentationStrategy::HangingIndent => split_hanging_indent(&lines),
        SegmentationStrategy::LeadingCapital => split_leading_capital(&lines),
    };

    let total = groups.len();
    let entries: Vec<BibliographyEntry> = groups
        .into_iter()
        .map(|group| build_entry(&group, config))
        .filter(|e| is_plausible_entry(&e.text, config.min_entry_chars))
        .collect();

    tracing::debug!(
        ?strategy,
        raw = total,
        kept = entries.len(),
        "bibliography segmented"
    );
    entries
}

/// Extract, segment, filter and sort the bibliography of a document.
///
/// Best effort: a document without a recognizable references header yields an
/// empty list.
pub fn extract_bibliography<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    extract_bibliography_with_config(pages, &ParsingConfig::default())
}

/// Config-aware version of [`extract_bibliography`].
pub fn extract_bibliography_with_config<S: AsRef<str>>(
    pages: &[S],
    config: &ParsingConfig,
) -> Vec<String> {
    let section = find_bibliography_section_with_config(pages, config);
    if section.trim().is_empty() {
        return Vec::new();
    }
    let mut entries = segment_entries_with_config(&section, config);
    sort_entries(&mut entries);
    entries.into_iter().map(|e| e.text).collect()
}

/// Stable sort by primary-author key; entries without a key go last.
pub fn sort_entries(entries: &mut [BibliographyEntry]) {
    entries.sort_by(|a, b| match (&a.sort_key, &b.sort_key) {
        (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Walk the lines carrying the previous line's indentation. A line at or left
/// of it opens a new entry; a deeper one continues the open entry.
fn split_hanging_indent<'a>(lines: &[(usize, &'a str)]) -> Vec<Vec<&'a str>> {
    enum State<'a> {
        NoOpenEntry,
        OpenEntry {
            prev_indent: usize,
            lines: Vec<&'a str>,
        },
    }

    let mut groups = Vec::new();
    let mut state = State::NoOpenEntry;

    for &(indent, line) in lines {
        state = match state {
            State::NoOpenEntry => State::OpenEntry {
                prev_indent: indent,
                lines: vec![line],
            },
            State::OpenEntry {
                prev_indent,
                mut lines,
            } => {
                if indent <= prev_indent {
                    groups.push(lines);
                    lines = vec![line];
                } else {
                    lines.push(line);
                }
                State::OpenEntry {
                    prev_indent: indent,
                    lines,
                }
            }
        };
    }

    if let State::OpenEntry { lines, .. } = state {
        groups.push(lines);
    }
    groups
}

fn split_leading_capital<'a>(lines: &[(usize, &'a str)]) -> Vec<Vec<&'a str>> {
    static ENTRY_START_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?:[0-9]+\.\s*|\[[0-9]+\]\s*)?\p{Lu}[\p{L}'\-]+").unwrap()
    });

    let mut groups: Vec<Vec<&'a str>> = Vec::new();
    for &(_, line) in lines {
        let trimmed = line.trim();
        if ENTRY_START_RE.is_match(trimmed) {
            groups.push(vec![line]);
        } else if let Some(current) = groups.last_mut() {
            current.push(line);
        }
        // text before the first entry start is dropped
    }
    groups
}

fn build_entry(lines: &[&str], config: &ParsingConfig) -> BibliographyEntry {
    static NUMBERING_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(?:[0-9]+\.|\[[0-9]+\])\s*").unwrap());

    let mut owned: Vec<&str> = lines.to_vec();
    if let Some(first) = owned.first_mut() {
        let line: &str = *first;
        let stripped_len = NUMBERING_RE.find(line).map_or(0, |m| m.end());
        *first = &line[stripped_len..];
    }
    let text = normalize_entry_text(&owned, config);
    let sort_key = primary_author_key(&text);
    BibliographyEntry { text, sort_key }
}

/// Lowercased surname from the capitalized name run opening `text`.
pub fn primary_author_key(text: &str) -> Option<String> {
    static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\p{Lu}[\p{L}'\-]+(?:\s+\p{Lu}[\p{L}'\-]+)*").unwrap()
    });
    AUTHOR_RE.find(text.trim_start()).map(|m| {
        m.as_str()
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    })
}

fn is_plausible_entry(text: &str, min_chars: usize) -> bool {
    static BARE_URL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(?:https?://|www\.|doi:)\S*$").unwrap());

    text.chars().count() >= min_chars
        && text.contains(char::is_whitespace)
        && !BARE_URL_RE.is_match(text)
}
