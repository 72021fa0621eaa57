//! Salsa Classic API access
//!
//! This module holds everything that talks to the `/api/*.sjs` endpoints:
//! - Building the shared HTTP client (cookie store, timeouts, user agent)
//! - Authenticating and resolving the organization ([`Session`])
//! - Paginated key listing ([`Session::list_keys`])
//! - Single record retrieval ([`Session::get_record`])

mod client;
mod keys;
mod record;
mod session;

pub use client::build_http_client;
pub use keys::{KeyFilter, PAGE_SIZE};
pub use session::Session;

use serde_json::Value;

/// Renders a scalar JSON value as the text Salsa would show for it
///
/// Salsa returns most fields as strings but keys occasionally arrive as
/// numbers. `null` reads as an empty string; arrays and objects have no
/// text form.
pub(crate) fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
