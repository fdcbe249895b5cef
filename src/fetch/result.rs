//! Captured response data.

use std::time::Duration;

use log::warn;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error_handling::RuleEvaluationError;

/// Everything the analyzers know about the fetched page.
///
/// Produced once per session and shared read-only (`Arc<FetchResult>`) by
/// every category.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    /// HTTP status code of the final response
    pub status: u16,
    /// Response headers of the final response (case-insensitive lookup)
    pub headers: HeaderMap,
    /// Decoded body (lossy UTF-8)
    pub body: String,
    /// Time from sending the request to the end of the body
    pub elapsed: Duration,
    /// Bytes received on the wire, before decoding
    pub transfer_size: usize,
    /// Body bytes after decoding
    pub decoded_size: usize,
    /// The body hit a size cap and was cut short
    pub truncated: bool,
}

impl FetchResult {
    /// Builds a result from already-captured parts.
    ///
    /// Transfer and decoded sizes both default to the body length.
    pub fn from_parts(
        url: Url,
        status: u16,
        headers: HeaderMap,
        body: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let body = body.into();
        Self {
            final_url: url.clone(),
            url,
            status,
            headers,
            transfer_size: body.len(),
            decoded_size: body.len(),
            body,
            elapsed,
            truncated: false,
        }
    }

    /// Adds a header, ignoring (and logging) names or values that are not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!("Ignoring invalid header {name:?}"),
        }
        self
    }

    /// Overrides the wire size.
    pub fn with_transfer_size(mut self, transfer_size: usize) -> Self {
        self.transfer_size = transfer_size;
        self
    }

    /// Whether a header with this name is present.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// First value of a header as text.
    ///
    /// # Errors
    ///
    /// Returns `RuleEvaluationError::InvalidHeader` if the header holds bytes
    /// that are not visible ASCII.
    pub fn header_str(&self, name: &str) -> Result<Option<&str>, RuleEvaluationError> {
        match self.headers.get(name) {
            None => Ok(None),
            Some(value) => value
                .to_str()
                .map(|value| Some(value.trim()))
                .map_err(|_| RuleEvaluationError::InvalidHeader {
                    name: name.to_string(),
                }),
        }
    }

    /// Whether the final status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the page ended up on HTTPS after redirects.
    pub fn is_https(&self) -> bool {
        self.final_url.scheme() == "https"
    }
}
