//! Authenticated connection to one Salsa Classic host

use crate::api::{build_http_client, field_text};
use crate::config::{ClientOptions, Credentials};
use crate::{Result, SalsaError};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use url::Url;

/// An authenticated Salsa session
///
/// Created once per run and shared read-only by every worker.
#[derive(Clone)]
pub struct Session {
    host: String,
    api_root: Url,
    client: Client,
    organization_key: String,
    organization_name: String,
}

impl Session {
    /// Authenticates and resolves the organization
    ///
    /// # Errors
    ///
    /// * `SalsaError::Auth` - Salsa answered with `"status": "error"` or an unreadable body
    /// * `SalsaError::OrganizationNotFound` - no organization with a key above 0
    /// * `SalsaError::UrlParse` - the host does not form a valid API URL
    pub async fn connect(creds: &Credentials, options: &ClientOptions) -> Result<Self> {
        options.validate()?;

        let client = build_http_client(options)?;
        let api_root = Url::parse(&format!("{}://{}/api/", options.scheme, creds.host))?;

        authenticate(&client, &api_root, creds).await?;

        let (organization_key, organization_name) =
            resolve_organization(&client, &api_root).await?;

        tracing::info!(
            "Authenticated to {} as {} for organization {} ({})",
            creds.host,
            creds.email,
            organization_name,
            organization_key
        );

        Ok(Self {
            host: creds.host.clone(),
            api_root,
            client,
            organization_key,
            organization_name,
        })
    }

    /// API host the session is bound to
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn organization_key(&self) -> &str {
        &self.organization_key
    }

    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    /// The shared HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Issues a GET against an API endpoint and decodes the JSON body
    ///
    /// `json=true` is always sent.
    pub(crate) async fn api_get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<Value, reqwest::Error> {
        api_get(&self.client, &self.api_root, endpoint, params).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("organization_key", &self.organization_key)
            .field("organization_name", &self.organization_name)
            .finish()
    }
}

async fn api_get(
    client: &Client,
    api_root: &Url,
    endpoint: &str,
    params: &[(&str, String)],
) -> std::result::Result<Value, reqwest::Error> {
    // Joining a bare file name onto ".../api/" cannot fail
    let url = api_root
        .join(endpoint)
        .unwrap_or_else(|_| api_root.clone());

    let mut query: Vec<(&str, &str)> = vec![("json", "true")];
    query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

    client.get(url).query(&query).send().await?.json().await
}

async fn authenticate(client: &Client, api_root: &Url, creds: &Credentials) -> Result<()> {
    let params = [
        ("email", creds.email.clone()),
        ("password", creds.password.clone()),
    ];

    let body = api_get(client, api_root, "authenticate.sjs", &params)
        .await
        .map_err(|e| SalsaError::Auth {
            detail: e.to_string(),
        })?;

    if body.get("status").and_then(Value::as_str) == Some("error") {
        return Err(SalsaError::Auth {
            detail: body.to_string(),
        });
    }

    Ok(())
}

/// Reads the organization table and picks the first real organization
///
/// Key 0 is a placeholder row; keys are compared as text, as Salsa returns them.
async fn resolve_organization(client: &Client, api_root: &Url) -> Result<(String, String)> {
    let params = [
        ("offset", "0,2".to_string()),
        ("object", "organization".to_string()),
        ("include", "organization_KEY,name".to_string()),
    ];

    let body = api_get(client, api_root, "getObjects.sjs", &params)
        .await
        .map_err(|e| SalsaError::Enumeration {
            table: "organization".to_string(),
            message: e.to_string(),
        })?;

    let rows = body.as_array().ok_or_else(|| SalsaError::Enumeration {
        table: "organization".to_string(),
        message: format!("expected a JSON array, got {}", body),
    })?;

    for row in rows {
        let key = row.get("organization_KEY").and_then(field_text);
        if let Some(key) = key {
            if key.as_str() > "0" {
                let name = row.get("name").and_then(field_text).unwrap_or_default();
                return Ok((key, name));
            }
        }
    }

    Err(SalsaError::OrganizationNotFound)
}
