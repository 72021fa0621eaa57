//! Fetching of rendered public pages

use crate::SalsaError;
use reqwest::Client;

/// A fetched page body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Decoded body text
    pub body: String,
}

/// Fetches a public page with a plain GET
///
/// Non-success status codes are logged and the body is still returned, so
/// whatever Salsa serves for the page is what gets archived.
///
/// # Errors
///
/// Transport failures and undecodable bodies are `SalsaError::PageFetch`.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, SalsaError> {
    let page_error = |source| SalsaError::PageFetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(page_error)?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} answered HTTP {}", url, status.as_u16());
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(page_error)?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}
