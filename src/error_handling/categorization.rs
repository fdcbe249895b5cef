//! Error categorization.
//!
//! Maps `reqwest` failures onto `FetchErrorKind` so the report can tell a
//! timeout from a DNS failure without inspecting error strings downstream.

use std::error::Error as StdError;

use super::types::{FetchError, FetchErrorKind};

/// Substrings hyper/std use when name resolution fails.
const DNS_FAILURE_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
];

/// Flattens an error and its `source()` chain into one message.
pub fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

fn is_dns_failure(message: &str) -> bool {
    let lowered = message.to_lowercase();
    DNS_FAILURE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Categorizes a `reqwest::Error` into a `FetchErrorKind`.
///
/// Checks timeouts first since reqwest may flag a timed-out connect as both
/// `is_connect()` and `is_timeout()`. Connect failures are split into DNS and
/// connection errors by inspecting the source chain.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_connect() {
        if is_dns_failure(&error_chain_message(error)) {
            FetchErrorKind::Dns
        } else {
            FetchErrorKind::Connect
        }
    } else if error.is_redirect() {
        FetchErrorKind::Redirect
    } else if error.is_body() {
        FetchErrorKind::Body
    } else if error.is_decode() {
        FetchErrorKind::Decode
    } else if error.is_builder() || error.is_request() {
        FetchErrorKind::Request
    } else {
        FetchErrorKind::Other
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::new(
            categorize_reqwest_error(&error),
            error_chain_message(&error),
        )
    }
}
