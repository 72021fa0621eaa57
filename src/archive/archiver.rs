//! The fetch → rewrite → persist pipeline for one page

use crate::api::Session;
use crate::archive::pdf::{PdfOptions, PdfRenderer};
use crate::archive::{fetch_page, rewrite_links, ArchiveOutcome, PdfStatus};
use crate::config::ArchiveVariant;
use crate::crawler::TaskHandler;
use crate::page::{FilenameRecipe, Task};
use crate::url::LinkRewriter;
use crate::{Result, SalsaError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Archives single pages for one session
pub struct PageArchiver {
    session: Arc<Session>,
    html_dir: PathBuf,
    pdf: Option<PdfOutput>,
    recipe: FilenameRecipe,
    rewriter: LinkRewriter,
}

struct PdfOutput {
    dir: PathBuf,
    renderer: Arc<dyn PdfRenderer>,
    options: PdfOptions,
}

impl PageArchiver {
    /// Creates an archiver that writes HTML only
    pub fn html_only(session: Arc<Session>, variant: ArchiveVariant, html_dir: PathBuf) -> Self {
        let rewriter = LinkRewriter::new(session.host(), variant.root_relative());
        Self {
            session,
            html_dir,
            pdf: None,
            recipe: FilenameRecipe::new(variant.trims_title()),
            rewriter,
        }
    }

    /// Adds PDF output; the PDF path becomes the idempotency target
    pub fn with_pdf(
        mut self,
        dir: PathBuf,
        renderer: Arc<dyn PdfRenderer>,
        options: PdfOptions,
    ) -> Self {
        self.pdf = Some(PdfOutput {
            dir,
            renderer,
            options,
        });
        self
    }

    /// Archives one page
    ///
    /// # Steps
    ///
    /// 1. Build the public URL and fetch the record
    /// 2. Compute output paths; if the target (PDF when rendering, HTML
    ///    otherwise) exists, return `Skipped` without fetching the page
    /// 3. Fetch the page, rewrite its links and write the HTML file
    /// 4. When rendering, write the PDF; directory and render failures are
    ///    recorded in the outcome and do not fail the task
    pub async fn archive(&self, task: &Task) -> Result<ArchiveOutcome> {
        let spec = &task.spec;
        let url = spec.page_url(
            self.session.host(),
            self.session.organization_key(),
            &task.key,
        );

        let record = self.session.get_record(spec, &task.key).await?;

        let html_path = self
            .recipe
            .path(&self.html_dir, spec, &record, &task.key, "html")?;
        let pdf_path = match &self.pdf {
            Some(pdf) => Some(self.recipe.path(&pdf.dir, spec, &record, &task.key, "pdf")?),
            None => None,
        };

        let target = pdf_path.as_ref().unwrap_or(&html_path);
        // Any stat failure reads as "not there yet"
        if tokio::fs::metadata(target).await.is_ok() {
            tracing::info!("{} skipped, {} exists", url, target.display());
            return Ok(ArchiveOutcome::Skipped {
                path: target.clone(),
            });
        }

        let page = fetch_page(self.session.client(), &url).await?;
        tracing::debug!(
            "Fetched {} (HTTP {}, {} bytes)",
            page.final_url,
            page.status_code,
            page.body.len()
        );

        let html = rewrite_links(&page.body, &self.rewriter)
            .map_err(|message| SalsaError::Parse { url: url.clone(), message })?;

        ensure_parent_dir(&html_path).await?;
        tokio::fs::write(&html_path, &html).await?;

        let pdf_status = match (&self.pdf, pdf_path) {
            (Some(pdf), Some(path)) => match ensure_parent_dir(&path).await {
                Err(e) => {
                    tracing::warn!("Cannot create PDF directory for {}: {}", url, e);
                    PdfStatus::Failed(e.to_string())
                }
                Ok(()) => match pdf.renderer.render(&html, &path, &pdf.options).await {
                    Ok(()) => PdfStatus::Rendered(path),
                    Err(e) => {
                        tracing::warn!("PDF rendering failed for {}: {}", url, e);
                        PdfStatus::Failed(e.to_string())
                    }
                },
            },
            _ => PdfStatus::NotRequested,
        };

        Ok(ArchiveOutcome::Archived {
            html: html_path,
            pdf: pdf_status,
        })
    }
}

#[async_trait]
impl TaskHandler for PageArchiver {
    async fn handle(&self, task: &Task) -> Result<ArchiveOutcome> {
        self.archive(task).await
    }
}

/// Creates the parent directory of `path` if needed
///
/// Concurrent workers may race to create the same table directory;
/// `create_dir_all` treats an existing directory as success.
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir).await,
        _ => Ok(()),
    }
}
