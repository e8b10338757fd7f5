use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use citecheck_core::{Analysis, CitationKey, CitedSource, PageCoverage};
use citecheck_parsing::group_numeric_by_page;

use crate::sections::{SectionKind, sections};
use crate::{ReportError, ReportFormat};

/// Render `analysis` in `format` and write it to `path`.
pub fn export_report(
    analysis: &Analysis,
    format: ReportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render(analysis, format)?;

    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    Ok(())
}

/// Render `analysis` as a string in `format`.
pub fn render(analysis: &Analysis, format: ReportFormat) -> Result<String, ReportError> {
    Ok(match format {
        ReportFormat::Text => export_text(analysis),
        ReportFormat::Markdown => export_markdown(analysis),
        ReportFormat::Json => export_json(analysis)?,
    })
}

/// Plain-text report: `--- Heading (N found) ---`, a description line, then
/// `- item` lines or `No entry`.
pub fn export_text(analysis: &Analysis) -> String {
    let mut out = String::from("--- Results ---\n");
    for section in sections(analysis) {
        out.push_str(&format!("\n--- {} ---\n", section.heading()));
        out.push_str(section.kind.description());
        out.push('\n');
        if section.items.is_empty() {
            out.push_str("No entry\n");
        }
        for item in &section.items {
            out.push_str(&format!("- {}\n", item));
        }
    }
    out
}

fn md_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn export_markdown(analysis: &Analysis) -> String {
    let mut out = String::from("# Citation Check Results\n\n");
    out.push_str(&format!(
        "**{}** pages scanned, **{}** author-year and **{}** numeric citations, **{}** source list entries.\n",
        analysis.total_pages,
        analysis.citations.len(),
        analysis.numeric_citations.len(),
        analysis.source_keys.len(),
    ));

    for section in sections(analysis) {
        out.push_str(&format!("\n## {}\n\n", section.heading()));
        out.push_str(&format!("_{}_\n\n", section.kind.description()));
        if section.items.is_empty() {
            out.push_str("No entry\n");
            continue;
        }
        for item in &section.items {
            let line = match section.kind {
                // keys and page labels are generated, never user text
                SectionKind::Matched | SectionKind::DocumentOnly | SectionKind::ListOnly => {
                    format!("- `{}`\n", item)
                }
                SectionKind::CitationFreePages | SectionKind::NumericCitations => {
                    format!("- {}\n", item)
                }
                SectionKind::Bibliography => format!("- {}\n", md_escape(item)),
            };
            out.push_str(&line);
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_pages: usize,
    matched: &'a [CitedSource],
    list_only: &'a [CitationKey],
    doc_only: &'a [CitedSource],
    uncited_ranges: &'a [String],
    numeric_by_page: BTreeMap<usize, Vec<String>>,
    coverage: &'a [PageCoverage],
    #[serde(skip_serializing_if = "Option::is_none")]
    bibliography: Option<&'a [String]>,
}

pub fn export_json(analysis: &Analysis) -> Result<String, ReportError> {
    let rec = &analysis.reconciliation;
    let report = JsonReport {
        total_pages: analysis.total_pages,
        matched: &rec.matched,
        list_only: &rec.list_only,
        doc_only: &rec.doc_only,
        uncited_ranges: &rec.uncited_ranges,
        numeric_by_page: group_numeric_by_page(&analysis.numeric_citations),
        coverage: &analysis.coverage,
        bibliography: analysis.bibliography.as_deref(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
