//! PDF rendering through wkhtmltopdf

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors from the PDF renderer; never fatal to a task
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("IO error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Fixed page layout for archived PDFs
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub page_size: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub ignore_load_errors: bool,
    pub ignore_media_errors: bool,
    pub disable_javascript: bool,
    pub disable_local_file_access: bool,
    pub zoom: f32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: "Letter".to_string(),
            margin_top: "0.50in".to_string(),
            margin_right: "0.50in".to_string(),
            margin_bottom: "0.50in".to_string(),
            margin_left: "0.50in".to_string(),
            ignore_load_errors: true,
            ignore_media_errors: true,
            disable_javascript: true,
            disable_local_file_access: true,
            zoom: 1.2,
        }
    }
}

impl PdfOptions {
    /// Command-line flags understood by wkhtmltopdf
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--page-size".to_string(),
            self.page_size.clone(),
            "--margin-top".to_string(),
            self.margin_top.clone(),
            "--margin-right".to_string(),
            self.margin_right.clone(),
            "--margin-bottom".to_string(),
            self.margin_bottom.clone(),
            "--margin-left".to_string(),
            self.margin_left.clone(),
        ];

        if self.ignore_load_errors {
            args.push("--load-error-handling".to_string());
            args.push("ignore".to_string());
        }
        if self.ignore_media_errors {
            args.push("--load-media-error-handling".to_string());
            args.push("ignore".to_string());
        }
        if self.disable_javascript {
            args.push("--disable-javascript".to_string());
        }
        if self.disable_local_file_access {
            args.push("--disable-local-file-access".to_string());
        }

        args.push("--zoom".to_string());
        args.push(self.zoom.to_string());
        args
    }
}

/// Something that turns HTML text into a PDF file
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, output: &Path, options: &PdfOptions)
        -> Result<(), RenderError>;
}

/// Renders with the wkhtmltopdf executable, HTML piped on stdin
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    program: PathBuf,
}

impl WkHtmlToPdf {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for WkHtmlToPdf {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

#[async_trait]
impl PdfRenderer for WkHtmlToPdf {
    async fn render(
        &self,
        html: &str,
        output: &Path,
        options: &PdfOptions,
    ) -> Result<(), RenderError> {
        let mut child = Command::new(&self.program)
            .args(options.to_args())
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
            // Closing stdin tells wkhtmltopdf the document is complete
            drop(stdin);
        }

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
