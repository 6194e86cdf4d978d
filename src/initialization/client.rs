//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;

/// Initializes an HTTP client with a fixed per-request timeout.
///
/// Shared by the database download and the HTTP ingest output. The timeout
/// covers the whole request, including reading the response body.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot
/// be initialized.
pub fn init_http_client(timeout: Duration) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("geoip_export/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
