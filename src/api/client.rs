use crate::config::ClientOptions;
use reqwest::Client;

/// Builds the HTTP client shared by every request of a run
///
/// The cookie store keeps the session cookie set by `authenticate.sjs`, so
/// all later calls (from any worker) are authenticated. `Client` is
/// internally reference counted and safe to use from many tasks at once.
///
/// # Example
///
/// ```no_run
/// use salsa_archiver::api::build_http_client;
/// use salsa_archiver::config::ClientOptions;
///
/// let client = build_http_client(&ClientOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &ClientOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}
