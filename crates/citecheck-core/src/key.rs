use crate::CitationKey;

/// Author marker used when no usable author token could be recovered.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Build the canonical key for an author token and a year.
///
/// - lowercases the author
/// - drops everything after the first comma (`"Smith, J."` → `"smith"`)
/// - collapses whitespace runs
///
/// An author token that is empty after cleanup becomes [`UNKNOWN_AUTHOR`], so the
/// result is always a well-formed key.
pub fn normalize(author: &str, year: &str) -> CitationKey {
    let surname = author.split(',').next().unwrap_or_default();
    let surname = surname
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let surname = if surname.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        surname
    };
    CitationKey(format!("{}_{}", surname, year.trim()))
}

/// Whether `token` is a 4-digit year in 1900..=2099.
pub fn is_plausible_year(token: &str) -> bool {
    token.len() == 4
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"))
}
