use std::collections::{BTreeMap, BTreeSet};

use crate::{CitationKey, CitedSource, NumericCitation, PageCitation, PageCoverage, Reconciliation};

/// Shortest run of consecutive pages rendered as `pages A-B`.
const MIN_DASHED_RUN: usize = 4;

/// Reconcile document citations against the keys parsed from a source list.
///
/// `matched` and `doc_only` are ordered by first cited page (ties by key),
/// `list_only` by key. `uncited_ranges` covers pages `1..=total_pages` that
/// carry neither an author-year nor a numeric citation.
pub fn reconcile(
    citations: &BTreeSet<PageCitation>,
    numeric: &BTreeSet<NumericCitation>,
    source_keys: &BTreeSet<CitationKey>,
    total_pages: usize,
) -> Reconciliation {
    let mut pages_by_key: BTreeMap<&CitationKey, BTreeSet<usize>> = BTreeMap::new();
    for c in citations {
        pages_by_key.entry(&c.key).or_default().insert(c.page);
    }

    let mut matched = Vec::new();
    let mut list_only = Vec::new();
    for key in source_keys {
        match pages_by_key.get(key) {
            Some(pages) => matched.push(CitedSource {
                key: key.clone(),
                pages: pages.iter().copied().collect(),
            }),
            None => list_only.push(key.clone()),
        }
    }

    let mut doc_only: Vec<CitedSource> = pages_by_key
        .iter()
        .filter(|(key, _)| !source_keys.contains(**key))
        .map(|(key, pages)| CitedSource {
            key: (*key).clone(),
            pages: pages.iter().copied().collect(),
        })
        .collect();

    sort_by_first_page(&mut matched);
    sort_by_first_page(&mut doc_only);
    list_only.sort();

    let uncited = uncited_pages(total_pages, citations, numeric);

    tracing::debug!(
        matched = matched.len(),
        list_only = list_only.len(),
        doc_only = doc_only.len(),
        uncited = uncited.len(),
        "reconciliation complete"
    );

    Reconciliation {
        matched,
        list_only,
        doc_only,
        uncited_ranges: encode_page_ranges(&uncited),
    }
}

fn sort_by_first_page(sources: &mut [CitedSource]) {
    sources.sort_by(|a, b| {
        a.first_page()
            .cmp(&b.first_page())
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Sorted pages in `1..=total_pages` with no citation of either style.
pub fn uncited_pages(
    total_pages: usize,
    citations: &BTreeSet<PageCitation>,
    numeric: &BTreeSet<NumericCitation>,
) -> Vec<usize> {
    let cited: BTreeSet<usize> = citations
        .iter()
        .map(|c| c.page)
        .chain(numeric.iter().map(|n| n.page))
        .collect();
    (1..=total_pages).filter(|p| !cited.contains(p)).collect()
}

/// Per-page citation counts for `1..=total_pages`.
pub fn page_coverage(
    total_pages: usize,
    citations: &BTreeSet<PageCitation>,
    numeric: &BTreeSet<NumericCitation>,
) -> Vec<PageCoverage> {
    let mut coverage: Vec<PageCoverage> = (1..=total_pages)
        .map(|page| PageCoverage {
            page,
            author_year: 0,
            numeric: 0,
        })
        .collect();
    for c in citations {
        if let Some(slot) = c.page.checked_sub(1).and_then(|i| coverage.get_mut(i)) {
            slot.author_year += 1;
        }
    }
    for n in numeric {
        if let Some(slot) = n.page.checked_sub(1).and_then(|i| coverage.get_mut(i)) {
            slot.numeric += 1;
        }
    }
    coverage
}

/// Group consecutive page numbers into readable runs.
///
/// - one page: `page 5`
/// - two or three pages: `pages 5, 6, 7`
/// - four or more: `pages 5-8`
///
/// A three-page run lists its middle page too, never only the endpoints
/// (`pages 5, 6, 7`, not `pages 5, 7`).
pub fn encode_page_ranges(pages: &[usize]) -> Vec<String> {
    let mut sorted = pages.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<(usize, usize)> = Vec::new();
    for page in sorted {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == page => *end = page,
            _ => runs.push((page, page)),
        }
    }

    runs.into_iter()
        .map(|(start, end)| {
            let len = end - start + 1;
            if len >= MIN_DASHED_RUN {
                format!("pages {}-{}", start, end)
            } else if len == 1 {
                format!("page {}", start)
            } else {
                let listed: Vec<String> = (start..=end).map(|p| p.to_string()).collect();
                format!("pages {}", listed.join(", "))
            }
        })
        .collect()
}
