//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the HTTP client used by the fetcher.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Whole-request timeout from the configuration, plus a TCP connect timeout
/// - Redirect following (up to `MAX_REDIRECT_HOPS`)
/// - No cookie store, so nothing persists between runs
///
/// Transparent decompression is not enabled: the fetcher decodes bodies itself
/// so that `content-encoding` stays visible to the performance analyzer.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let connect_timeout = Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS).min(config.timeout());
    let client = ClientBuilder::new()
        .timeout(config.timeout())
        .connect_timeout(connect_timeout)
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .build()?;
    Ok(Arc::new(client))
}
