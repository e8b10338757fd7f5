use std::path::Path;

use mupdf::{Document, TextPageFlags};

use citecheck_core::{BackendError, DocumentBackend};

/// Horizontal offset, in points, rendered as one leading space.
const POINTS_PER_SPACE: f32 = 5.0;

/// Upper bound on synthesized indentation.
const MAX_INDENT: usize = 16;

/// MuPDF-based implementation of [`DocumentBackend`].
///
/// This crate is the sole AGPL island. It isolates the mupdf dependency
/// (which is AGPL-3.0) so that plain-text code paths do not transitively
/// depend on it.
///
/// By default, text in the bottom 5% of each page (footers) and top 4%
/// (headers) is excluded so that running heads and page furniture are not
/// scanned as body text.
///
/// MuPDF reports line positions rather than leading whitespace, so each line is
/// prefixed with spaces proportional to its offset from the left edge of its
/// block. Hanging-indent bibliographies keep their shape this way.
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// Default 0.05. `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// Default 0.04. `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            footer_exclusion_ratio: Some(0.05),
            header_exclusion_ratio: Some(0.04),
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }
}

impl DocumentBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        if !path.exists() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let page_bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut page_text = String::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                // Skip blocks entirely within the header region
                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    continue;
                }

                // Skip blocks whose top edge is in the footer region
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    continue;
                }

                for line in block.lines() {
                    let indent = indent_width(line.bounds().x0, block_bounds.x0);
                    page_text.extend(std::iter::repeat_n(' ', indent));
                    page_text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "mupdf extraction complete");
        Ok(pages_text)
    }
}

/// Leading spaces for a line starting at `line_x0` inside a block starting at `block_x0`.
fn indent_width(line_x0: f32, block_x0: f32) -> usize {
    let offset = line_x0 - block_x0;
    if !offset.is_finite() || offset <= 0.0 {
        return 0;
    }
    ((offset / POINTS_PER_SPACE).round() as usize).min(MAX_INDENT)
}
