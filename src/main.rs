//! salsa-pdfs entry point
//!
//! Archives Salsa Classic email blasts and blog entries as HTML and PDF.

use anyhow::Context;
use clap::Parser;
use salsa_archiver::app::{cancel_on_ctrl_c, run_archive, setup_logging};
use salsa_archiver::config::{RunConfig, DEFAULT_HTML_DIR, DEFAULT_PDF_DIR, DEFAULT_WORKERS};
use salsa_archiver::output::print_report;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Find public facing pages and write them as PDFs
///
/// Targeted and multi-content targeted actions are not handled.
#[derive(Parser, Debug)]
#[command(name = "salsa-pdfs")]
#[command(version)]
#[command(about = "Find public facing pages and write them as PDFs", long_about = None)]
struct Cli {
    /// YAML file with login credentials (host, email, password)
    #[arg(long, value_name = "FILE")]
    login: Option<PathBuf>,

    /// Directory to store PDFs. Created as needed.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PDF_DIR)]
    pdfs: PathBuf,

    /// Directory to store HTML. Created as needed.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_HTML_DIR)]
    html: PathBuf,

    /// Just generate PDFs for email blasts
    #[arg(long)]
    just_blasts: bool,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// wkhtmltopdf executable
    #[arg(long, value_name = "PATH", default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns Ok(false) when the run started but hit a fatal error
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = RunConfig::pdf(cli.login, cli.html, cli.pdfs, cli.just_blasts)?
        .with_workers(cli.workers)?
        .with_wkhtmltopdf(cli.wkhtmltopdf);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let report = run_archive(&config, cancel)
        .await
        .context("archive run could not start")?;

    if !cli.quiet {
        print_report(&report);
    }

    if let Some(fatal) = &report.fatal {
        tracing::error!("Run aborted: {}", fatal);
        return Ok(false);
    }

    Ok(true)
}
