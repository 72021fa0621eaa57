use crate::config::types::Credentials;
use crate::config::validation::validate_credentials;
use crate::ConfigError;
use std::path::Path;

/// On-disk formats accepted for the credential file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFormat {
    Yaml,
    Toml,
}

impl CredentialFormat {
    /// Picks the format from the file extension; anything but `.toml` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Loads and validates a credential file from the given path
///
/// # Arguments
///
/// * `path` - Path to a YAML (or `.toml`) file with `host`, `email` and `password`
///
/// # Returns
///
/// * `Ok(Credentials)` - Successfully loaded and validated credentials
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_credentials(&content, CredentialFormat::from_path(path))
}

/// Parses and validates credential text in the given format
pub fn parse_credentials(content: &str, format: CredentialFormat) -> Result<Credentials, ConfigError> {
    let creds: Credentials = match format {
        CredentialFormat::Yaml => serde_yaml::from_str(content)?,
        CredentialFormat::Toml => toml::from_str(content)?,
    };

    validate_credentials(&creds)?;

    Ok(creds)
}
