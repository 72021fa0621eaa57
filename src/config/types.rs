use crate::config::validation::{validate_client_options, validate_run_config};
use crate::url::RootRelative;
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Number of concurrent workers used when none is requested
pub const DEFAULT_WORKERS: usize = 10;

/// Default directory for HTML output
pub const DEFAULT_HTML_DIR: &str = "./html";

/// Default directory for PDF output
pub const DEFAULT_PDF_DIR: &str = "./pdfs";

/// Salsa Classic login credentials
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// API host, e.g. "salsa4.salsalabs.com"
    pub host: String,

    /// Login email address
    pub email: String,

    /// Login password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client settings shared by every request of a run
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Scheme used for API calls ("https" in production)
    pub scheme: String,

    /// User-Agent header value
    pub user_agent: String,

    /// Overall request timeout
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            user_agent: format!("salsa-archiver/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientOptions {
    /// Returns options that talk plain HTTP to the API, used against local mock servers
    pub fn plain_http() -> Self {
        Self {
            scheme: "http".to_string(),
            ..Self::default()
        }
    }

    /// Checks the options for values the HTTP layer cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_client_options(self)
    }
}

/// Which of the two archiving tools a run behaves like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveVariant {
    /// Blasts and blog entries, written as HTML and rendered to PDF
    Pdf,

    /// Completed blasts only, written as HTML
    HtmlOnly,
}

impl ArchiveVariant {
    /// Root-relative link strategy used by this variant's rewriter
    pub fn root_relative(&self) -> RootRelative {
        match self {
            Self::Pdf => RootRelative::Prefix,
            Self::HtmlOnly => RootRelative::BaseJoin,
        }
    }

    /// Whether key listing keeps only records whose Stage is Complete
    pub fn completed_only(&self) -> bool {
        matches!(self, Self::HtmlOnly)
    }

    /// Whether sanitized titles are trimmed before building filenames
    pub fn trims_title(&self) -> bool {
        matches!(self, Self::HtmlOnly)
    }

    /// Whether this variant renders PDFs
    pub fn renders_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Fully resolved settings for one archive run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Credential file given with --login
    pub login_file: PathBuf,

    /// Root directory for HTML output
    pub html_dir: PathBuf,

    /// Root directory for PDF output (PDF variant only)
    pub pdf_dir: Option<PathBuf>,

    /// Restrict the run to email blasts
    pub just_blasts: bool,

    /// Tool behavior
    pub variant: ArchiveVariant,

    /// Size of the worker pool
    pub workers: usize,

    /// Path or name of the wkhtmltopdf executable
    pub wkhtmltopdf: PathBuf,

    /// HTTP client settings
    pub client: ClientOptions,
}

impl RunConfig {
    /// Builds the configuration for the PDF-producing tool
    ///
    /// `login_file` is optional so that a missing `--login` flag is reported
    /// as [`ConfigError::MissingLogin`] before anything touches the network.
    pub fn pdf(
        login_file: Option<PathBuf>,
        html_dir: PathBuf,
        pdf_dir: PathBuf,
        just_blasts: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            login_file: login_file.ok_or(ConfigError::MissingLogin)?,
            html_dir,
            pdf_dir: Some(pdf_dir),
            just_blasts,
            variant: ArchiveVariant::Pdf,
            workers: DEFAULT_WORKERS,
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            client: ClientOptions::default(),
        };
        validate_run_config(&config)?;
        Ok(config)
    }

    /// Builds the configuration for the completed-blast HTML tool
    pub fn html_only(login_file: Option<PathBuf>, html_dir: PathBuf) -> Result<Self, ConfigError> {
        let config = Self {
            login_file: login_file.ok_or(ConfigError::MissingLogin)?,
            html_dir,
            pdf_dir: None,
            just_blasts: true,
            variant: ArchiveVariant::HtmlOnly,
            workers: DEFAULT_WORKERS,
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            client: ClientOptions::default(),
        };
        validate_run_config(&config)?;
        Ok(config)
    }

    /// Overrides the worker count
    pub fn with_workers(mut self, workers: usize) -> Result<Self, ConfigError> {
        self.workers = workers;
        validate_run_config(&self)?;
        Ok(self)
    }

    /// Overrides the wkhtmltopdf executable
    pub fn with_wkhtmltopdf(mut self, path: PathBuf) -> Self {
        self.wkhtmltopdf = path;
        self
    }

    /// Overrides the HTTP client settings
    pub fn with_client(mut self, client: ClientOptions) -> Result<Self, ConfigError> {
        self.client = client;
        validate_run_config(&self)?;
        Ok(self)
    }
}
