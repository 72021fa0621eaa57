//! Configuration module for the archiver
//!
//! This module handles loading and validating the Salsa credential file and
//! the typed settings for one archive run.
//!
//! # Example
//!
//! ```no_run
//! use salsa_archiver::config::load_credentials;
//! use std::path::Path;
//!
//! let creds = load_credentials(Path::new("login.yaml")).unwrap();
//! println!("Archiving from {}", creds.host);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArchiveVariant, ClientOptions, Credentials, RunConfig, DEFAULT_HTML_DIR, DEFAULT_PDF_DIR,
    DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{load_credentials, parse_credentials, CredentialFormat};
