//! Archiving of individual pages
//!
//! This module contains the per-task pipeline:
//! - Fetching the rendered public page
//! - Rewriting embedded links in the markup
//! - Writing the HTML file and, for the PDF tool, rendering a PDF next to it

mod archiver;
mod fetcher;
mod html;
mod pdf;

pub use archiver::{ensure_parent_dir, PageArchiver};
pub use fetcher::{fetch_page, FetchedPage};
pub use html::{rewrite_links, REWRITTEN_ATTRIBUTES, REWRITTEN_TAGS};
pub use pdf::{PdfOptions, PdfRenderer, RenderError, WkHtmlToPdf};

use std::path::PathBuf;

/// What happened to the PDF half of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfStatus {
    /// This run does not produce PDFs
    NotRequested,

    /// PDF written to the given path
    Rendered(PathBuf),

    /// Rendering failed; the HTML file still counts as archived
    Failed(String),
}

/// Successful result of archiving one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The page was fetched, rewritten and written
    Archived { html: PathBuf, pdf: PdfStatus },

    /// The target file already existed; nothing was fetched or written
    Skipped { path: PathBuf },
}

impl ArchiveOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
