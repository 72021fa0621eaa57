//! Salsa Archiver: offline copies of Salsa Classic public pages
//!
//! This crate enumerates email blasts and blog entries through the Salsa
//! Classic API, fetches each public page, rewrites legacy links to the
//! current serving domains, and writes the result to disk as HTML (and,
//! optionally, PDF) using a bounded pool of concurrent workers.

pub mod api;
pub mod app;
pub mod archive;
pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for archiver operations
#[derive(Debug, Error)]
pub enum SalsaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {detail}")]
    Auth { detail: String },

    #[error("No organization with a key greater than 0 was found")]
    OrganizationNotFound,

    #[error("Failed to list keys for {table}: {message}")]
    Enumeration { table: String, message: String },

    #[error("Failed to read {table} record {key}: {message}")]
    Record {
        table: String,
        key: String,
        message: String,
    },

    #[error("HTTP error for {url}: {source}")]
    PageFetch { url: String, source: reqwest::Error },

    #[error("HTML rewrite error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Unparseable Salsa date: {value:?}")]
    DateParse { value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

impl SalsaError {
    /// Returns true if this error must abort the whole run
    ///
    /// Startup, listing and record errors leave the run without the inputs
    /// it needs. Page fetch, rewrite, date and filesystem errors only cost
    /// the task that hit them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Auth { .. }
                | Self::OrganizationNotFound
                | Self::Enumeration { .. }
                | Self::Record { .. }
                | Self::Http(_)
                | Self::UrlParse(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--login is REQUIRED")]
    MissingLogin,

    #[error("Failed to read credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for archiver operations
pub type Result<T> = std::result::Result<T, SalsaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::Session;
pub use archive::{ArchiveOutcome, PageArchiver};
pub use config::{ArchiveVariant, Credentials, RunConfig};
pub use crawler::Orchestrator;
pub use output::RunReport;
pub use page::{PageSpec, Record, Task};
pub use url::LinkRewriter;
