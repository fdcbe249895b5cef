//! Page fetching.
//!
//! `Fetcher` performs the single HTTP GET an analysis needs and captures the
//! status, headers, timing and decoded body as a `FetchResult`. Sessions use
//! it through the `PageSource` trait, normally wrapped in a `SharedFetch` so
//! that every category awaits the same request.

mod decode;
mod request;
mod result;
mod source;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::config::{Config, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{FetchError, FetchErrorKind, InitializationError};
use crate::initialization::init_client;
use crate::target::AnalysisTarget;

pub use result::FetchResult;
pub use source::{PageSource, SharedFetch, StaticPage};

use request::RequestHeaders;

/// Network page source backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Arc<reqwest::Client>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Creates a fetcher around an existing client.
    ///
    /// `timeout` bounds the whole fetch, body and decoding included.
    pub fn new(client: Arc<reqwest::Client>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            max_body_bytes: MAX_RESPONSE_BODY_SIZE,
        }
    }

    /// Creates a fetcher with a client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        Ok(Self::new(client, config.timeout()))
    }

    /// Overrides the transfer cap.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Fetches `target` once.
    ///
    /// Non-2xx responses are returned as a normal `FetchResult`.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` for DNS, connect, timeout, redirect, body and
    /// decoding failures.
    pub async fn fetch_page(&self, target: &AnalysisTarget) -> Result<FetchResult, FetchError> {
        info!("Fetching {target}");
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.request(target, start)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::new(
                FetchErrorKind::Timeout,
                format!(
                    "no complete response from {target} within {}s",
                    self.timeout.as_secs_f32()
                ),
            )),
        };

        match &result {
            Ok(page) => info!(
                "Fetched {} ({} status, {} bytes on the wire, {} ms)",
                page.final_url,
                page.status,
                page.transfer_size,
                page.elapsed.as_millis()
            ),
            Err(e) => info!("Fetch of {target} failed: {e}"),
        }
        result
    }

    async fn request(
        &self,
        target: &AnalysisTarget,
        start: Instant,
    ) -> Result<FetchResult, FetchError> {
        for (name, value) in RequestHeaders::as_vec() {
            trace!("Request header {name}: {value}");
        }

        let mut response =
            RequestHeaders::apply_to_request_builder(self.client.get(target.url().clone()))
                .send()
                .await?;

        let final_url = response.url().clone();
        if final_url != *target.url() {
            debug!("Redirected from {target} to {final_url}");
        }
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let content_length = response.content_length();

        let (raw, truncated) = read_body(&mut response, self.max_body_bytes).await?;
        let transfer_size = match content_length {
            Some(length) if truncated => usize::try_from(length).unwrap_or(usize::MAX),
            _ => raw.len(),
        };
        if truncated {
            debug!(
                "Body of {final_url} truncated at {} bytes",
                self.max_body_bytes
            );
        }

        let encoding = headers
            .get(reqwest::header::CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok());
        if let Some(encoding) = encoding {
            debug!("Content-Encoding for {final_url}: {encoding}");
        }
        let decoded = decode::decode_body(raw, encoding, truncated)?;
        let body = String::from_utf8_lossy(&decoded.bytes).into_owned();

        Ok(FetchResult {
            url: target.url().clone(),
            final_url,
            status,
            headers,
            decoded_size: decoded.bytes.len(),
            body,
            elapsed: start.elapsed(),
            transfer_size,
            truncated: truncated || decoded.capped,
        })
    }
}

impl PageSource for Fetcher {
    async fn fetch(&self, target: &AnalysisTarget) -> Result<Arc<FetchResult>, FetchError> {
        self.fetch_page(target).await.map(Arc::new)
    }
}

/// Reads the body chunk by chunk, stopping at `limit` bytes.
async fn read_body(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<(Vec<u8>, bool), FetchError> {
    let mut raw = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit.saturating_sub(raw.len());
        if chunk.len() > remaining {
            raw.extend_from_slice(&chunk[..remaining]);
            return Ok((raw, true));
        }
        raw.extend_from_slice(&chunk);
    }
    Ok((raw, false))
}
