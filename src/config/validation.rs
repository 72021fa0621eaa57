use crate::config::types::{ClientOptions, Credentials, RunConfig};
use crate::ConfigError;

/// Validates a credential record
pub fn validate_credentials(creds: &Credentials) -> Result<(), ConfigError> {
    validate_host(&creds.host)?;

    if creds.email.trim().is_empty() {
        return Err(ConfigError::Validation("email cannot be empty".to_string()));
    }

    if creds.password.is_empty() {
        return Err(ConfigError::Validation(
            "password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the API host: a bare authority, no scheme and no path
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if host.contains("://") {
        return Err(ConfigError::Validation(format!(
            "host must not include a scheme, got '{}'",
            host
        )));
    }

    if host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "host must be a bare hostname, got '{}'",
            host
        )));
    }

    Ok(())
}

/// Validates HTTP client settings
pub fn validate_client_options(options: &ClientOptions) -> Result<(), ConfigError> {
    if options.scheme != "https" && options.scheme != "http" {
        return Err(ConfigError::Validation(format!(
            "scheme must be http or https, got '{}'",
            options.scheme
        )));
    }

    if options.timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates run settings
pub fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "workers must be >= 1, got {}",
            config.workers
        )));
    }

    if config.html_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "html directory cannot be empty".to_string(),
        ));
    }

    if config.variant.renders_pdf() {
        match &config.pdf_dir {
            Some(dir) if !dir.as_os_str().is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "pdf directory is required when rendering PDFs".to_string(),
                ))
            }
        }
    }

    validate_client_options(&config.client)
}
