//! Top-level run wiring shared by both binaries

use crate::api::{KeyFilter, Session};
use crate::archive::{PageArchiver, PdfOptions, WkHtmlToPdf};
use crate::config::{load_credentials, ArchiveVariant, RunConfig};
use crate::crawler::{build_tasks, Orchestrator};
use crate::output::RunReport;
use crate::page::{PageSpec, EMAIL_BLAST_TABLE};
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Page kinds processed by a run, in processing order
pub fn specs_for(config: &RunConfig) -> Vec<Arc<PageSpec>> {
    let specs = match config.variant {
        ArchiveVariant::Pdf => PageSpec::builtin(),
        ArchiveVariant::HtmlOnly => vec![PageSpec::email_blast()],
    };

    specs
        .into_iter()
        .filter(|spec| !config.just_blasts || spec.table() == EMAIL_BLAST_TABLE)
        .map(Arc::new)
        .collect()
}

/// Runs one archive pass
///
/// Startup errors (credentials, authentication, organization, key listing)
/// are returned as `Err`. Once workers start, per-task results and any
/// fatal error are carried in the returned [`RunReport`].
pub async fn run_archive(config: &RunConfig, cancel: CancellationToken) -> Result<RunReport> {
    let creds = load_credentials(&config.login_file)?;
    let session = Arc::new(Session::connect(&creds, &config.client).await?);

    match config.variant {
        ArchiveVariant::Pdf => tracing::info!(
            "Salsa: creating PDFs for {}",
            session.organization_name()
        ),
        ArchiveVariant::HtmlOnly => tracing::info!(
            "Salsa: creating email blast HTML files for {}",
            session.organization_name()
        ),
    }

    let filter = if config.variant.completed_only() {
        KeyFilter::CompletedOnly
    } else {
        KeyFilter::All
    };
    let tasks = build_tasks(&session, &specs_for(config), filter).await?;

    let mut archiver = PageArchiver::html_only(
        Arc::clone(&session),
        config.variant,
        config.html_dir.clone(),
    );
    if let (true, Some(pdf_dir)) = (config.variant.renders_pdf(), &config.pdf_dir) {
        archiver = archiver.with_pdf(
            pdf_dir.clone(),
            Arc::new(WkHtmlToPdf::new(config.wkhtmltopdf.clone())),
            PdfOptions::default(),
        );
    }

    let orchestrator =
        Orchestrator::new(Arc::new(archiver), config.workers).with_cancellation(cancel);

    Ok(orchestrator.run(tasks).await)
}

/// Sets up the logging/tracing subscriber based on verbosity level
pub fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("salsa_archiver=info,warn"),
            1 => EnvFilter::new("salsa_archiver=debug,info"),
            2 => EnvFilter::new("salsa_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels `token` when the process receives Ctrl-C
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; finishing in-flight pages");
            token.cancel();
        }
    });
}
