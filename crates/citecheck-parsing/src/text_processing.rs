use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config::ParsingConfig;

/// Common compound-word suffixes that should keep the hyphen.
pub(crate) static COMPOUND_SUFFIXES: &[&str] = &[
    "based",
    "driven",
    "aware",
    "oriented",
    "specific",
    "related",
    "dependent",
    "independent",
    "like",
    "free",
    "friendly",
    "scale",
    "level",
    "order",
    "class",
    "type",
    "style",
    "wise",
    "fold",
    "time",
    "world",
    "source",
    "domain",
    "sensitive",
    "grained",
];

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Fix hyphenation from line wraps while preserving compound words.
///
/// - `"Com- plex"` or `"Com-\nplex"` → `"Complex"`
/// - `"data- driven"` → `"data-driven"`
/// - `"ISO9001- compliant"` → `"ISO9001-compliant"`
pub fn fix_hyphenation(text: &str) -> String {
    fix_hyphenation_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`fix_hyphenation`].
pub(crate) fn fix_hyphenation_with_config(text: &str, config: &ParsingConfig) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-\s+(\p{L}\w*)").unwrap());

    let defaults: Vec<String> = COMPOUND_SUFFIXES.iter().map(|s| s.to_string()).collect();
    let suffixes: HashSet<String> = config
        .compound_suffixes
        .resolve(&defaults)
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect();

    RE.replace_all(text, |caps: &regex::Captures| {
        let before = &caps[1];
        let after = &caps[2];

        if before.chars().all(|c| c.is_ascii_digit()) || suffixes.contains(&after.to_lowercase())
        {
            format!("{}-{}", before, after)
        } else {
            format!("{}{}", before, after)
        }
    })
    .into_owned()
}

/// Remove residual extraction debris: bracketed numeric markers left over from
/// numbered lists, escape-like tokens (`\n`, `\x0c`, `\u00e9`) and control
/// characters. Whitespace is collapsed afterwards.
pub fn strip_artifacts(text: &str) -> String {
    static BRACKET_NUM_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\[\d+(?:\s*[,\-–]\s*\d+)*\]").unwrap());
    static ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\\(?:x[0-9A-Fa-f]{2}|u[0-9A-Fa-f]{4}|[A-Za-z]{1,2}\b)").unwrap()
    });
    static CONTROL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[\x00-\x08\x0B-\x1F\x7F\u{FFFD}]").unwrap());
    static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([.,;:])").unwrap());

    let text = BRACKET_NUM_RE.replace_all(text, " ");
    let text = ESCAPE_RE.replace_all(&text, " ");
    let text = CONTROL_RE.replace_all(&text, " ");
    let text = collapse_whitespace(&text);
    SPACE_BEFORE_PUNCT_RE.replace_all(&text, "$1").into_owned()
}

/// Collapse every whitespace run into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join the raw lines of one bibliography entry into a single clean string.
pub(crate) fn normalize_entry_text(lines: &[&str], config: &ParsingConfig) -> String {
    let joined = lines
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join(" ");
    let joined = expand_ligatures(&joined);
    let joined = fix_hyphenation_with_config(&joined, config);
    strip_artifacts(&joined)
}
