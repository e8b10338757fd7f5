use std::io::Write;
use std::path::Path;

use citecheck_core::Analysis;
use citecheck_reporting::{Section, SectionKind, sections};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the one-line description of what was loaded.
pub fn print_input_summary(
    w: &mut dyn Write,
    document: &Path,
    analysis: &Analysis,
    color: ColorMode,
) -> std::io::Result<()> {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| document.display().to_string());
    let line = format!(
        "({} pages, {} author-year and {} numeric citations, {} source list entries)",
        analysis.total_pages,
        analysis.citations.len(),
        analysis.numeric_citations.len(),
        analysis.source_keys.len()
    );
    if color.enabled() {
        writeln!(w, "Checking citations in {}...", name.bold())?;
        writeln!(w, "{}", line.dimmed())?;
    } else {
        writeln!(w, "Checking citations in {}...", name)?;
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

/// Print the full sectioned report.
pub fn print_report(w: &mut dyn Write, analysis: &Analysis, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "\n{}", "--- Results ---".bold())?;
    } else {
        writeln!(w, "\n--- Results ---")?;
    }
    for section in sections(analysis) {
        print_section(w, &section, color)?;
    }
    Ok(())
}

fn print_section(w: &mut dyn Write, section: &Section, color: ColorMode) -> std::io::Result<()> {
    let heading = format!("--- {} ---", section.heading());
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", heading.bold().cyan())?;
        writeln!(w, "{}", section.kind.description().dimmed())?;
    } else {
        writeln!(w, "{}", heading)?;
        writeln!(w, "{}", section.kind.description())?;
    }

    if section.items.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "No entry".dimmed())?;
        } else {
            writeln!(w, "No entry")?;
        }
        return Ok(());
    }

    for item in &section.items {
        if !color.enabled() {
            writeln!(w, "- {}", item)?;
            continue;
        }
        match section.kind {
            SectionKind::Matched => writeln!(w, "- {}", item.green())?,
            SectionKind::ListOnly => writeln!(w, "- {}", item.yellow())?,
            SectionKind::DocumentOnly => writeln!(w, "- {}", item.red())?,
            SectionKind::CitationFreePages => writeln!(w, "- {}", item.magenta())?,
            SectionKind::NumericCitations | SectionKind::Bibliography => writeln!(w, "- {}", item)?,
        }
    }
    Ok(())
}

/// Tell the user where the report went.
pub fn print_saved(w: &mut dyn Write, path: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "Results saved to {}", path.display().bold())?;
    } else {
        writeln!(w, "Results saved to {}", path.display())?;
    }
    Ok(())
}
