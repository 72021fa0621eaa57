//! blast-html entry point
//!
//! Writes completed email blasts to disk as HTML. Blasts that were never
//! sent are not saved. Links still point at the Salsa Classic account, so
//! images disappear if that account goes away.

use anyhow::Context;
use clap::Parser;
use salsa_archiver::app::{cancel_on_ctrl_c, run_archive, setup_logging};
use salsa_archiver::config::{RunConfig, DEFAULT_HTML_DIR, DEFAULT_WORKERS};
use salsa_archiver::output::print_report;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Write completed email blasts to disk as HTML
#[derive(Parser, Debug)]
#[command(name = "blast-html")]
#[command(version)]
#[command(about = "Write completed email blasts to disk as HTML", long_about = None)]
struct Cli {
    /// YAML file with login credentials (host, email, password)
    #[arg(long, value_name = "FILE")]
    login: Option<PathBuf>,

    /// Directory to store HTML. Created as needed.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_HTML_DIR)]
    html: PathBuf,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

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

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = RunConfig::html_only(cli.login, cli.html)?.with_workers(cli.workers)?;

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
