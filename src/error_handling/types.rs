//! Error type definitions.
//!
//! This module defines all error types used throughout the library. Errors are
//! contained at the category boundary: the aggregator and the report only ever
//! see a resolved `CategoryResult` or a `CategoryError`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid library configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Request timeout must be at least one second.
    #[error("timeout_seconds must be between 1 and {max} (got {got})")]
    TimeoutOutOfRange {
        /// Configured value
        got: u64,
        /// Upper bound
        max: u64,
    },

    /// At least one category must be analyzed.
    #[error("at least one category must be selected")]
    NoCategories,

    /// Minimum score must lie in `[0, 100]`.
    #[error("min_score must be between 0 and 100 (got {0})")]
    MinScoreOutOfRange(u8),

    /// A threshold pair is inverted or zero.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// The submitted URL cannot be audited. Analysis never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Nothing was submitted.
    #[error("target URL is empty")]
    Empty,

    /// Input longer than the accepted maximum.
    #[error("target URL exceeds maximum length ({length} > {max})")]
    TooLong {
        /// Length of the submitted input
        length: usize,
        /// Accepted maximum
        max: usize,
    },

    /// Input does not parse as an absolute URL.
    #[error("malformed target URL '{input}': {reason}")]
    Malformed {
        /// The (normalized) input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Scheme other than http/https.
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// Host has an empty label (e.g. `example..com`).
    #[error("target URL host '{0}' is not a valid domain")]
    InvalidHost(String),
}

/// Categories of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FetchErrorKind {
    /// Request exceeded its timeout
    Timeout,
    /// Host name could not be resolved
    Dns,
    /// TCP/TLS connection failed
    Connect,
    /// Redirect loop or too many redirects
    Redirect,
    /// Reading the response body failed
    Body,
    /// `content-encoding` could not be decoded
    Decode,
    /// Request could not be built or sent
    Request,
    /// Anything else
    Other,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchErrorKind {
    /// Returns a human-readable string representation of the error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "HTTP request timeout error",
            FetchErrorKind::Dns => "DNS lookup error",
            FetchErrorKind::Connect => "HTTP request connect error",
            FetchErrorKind::Redirect => "HTTP request redirect error",
            FetchErrorKind::Body => "HTTP request body error",
            FetchErrorKind::Decode => "HTTP response decode error",
            FetchErrorKind::Request => "HTTP request error",
            FetchErrorKind::Other => "HTTP request other error",
        }
    }
}

/// Network, DNS, timeout or body failure while fetching the target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {reason}")]
pub struct FetchError {
    /// Failure category
    pub kind: FetchErrorKind,
    /// Underlying message (error chain flattened)
    pub reason: String,
}

impl FetchError {
    /// Creates a new fetch error.
    pub fn new(kind: FetchErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// A single rule could not be evaluated.
///
/// The rule is reported as an `unknown` item and excluded from the category
/// score; the remaining rules still contribute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleEvaluationError {
    /// A response header holds bytes that are not visible ASCII/UTF-8.
    #[error("header '{name}' has a non-text value")]
    InvalidHeader {
        /// Header name
        name: String,
    },

    /// The page data needed by this rule is not available.
    #[error("{0}")]
    Unsupported(String),
}

/// A category could not produce a score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The page could not be fetched.
    #[error("page could not be fetched: {0}")]
    Fetch(#[from] FetchError),

    /// Unexpected fault while parsing or analyzing (task panicked).
    #[error("analysis failed: {0}")]
    Internal(String),

    /// The session was cancelled before this category resolved.
    #[error("analysis cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_fetch_error_kind_as_str() {
        assert_eq!(
            FetchErrorKind::Timeout.as_str(),
            "HTTP request timeout error"
        );
        assert_eq!(FetchErrorKind::Dns.as_str(), "DNS lookup error");
    }

    #[test]
    fn test_all_fetch_error_kinds_have_string_representation() {
        for kind in FetchErrorKind::iter() {
            assert!(!kind.as_str().is_empty(), "{:?} should have a string", kind);
        }
    }

    #[test]
    fn test_fetch_error_display_includes_kind_and_reason() {
        let error = FetchError::new(FetchErrorKind::Timeout, "after 10s");
        assert_eq!(error.to_string(), "HTTP request timeout error: after 10s");
    }

    #[test]
    fn test_category_error_from_fetch_error() {
        let error: CategoryError = FetchError::new(FetchErrorKind::Dns, "no such host").into();
        assert!(matches!(error, CategoryError::Fetch(_)));
        assert!(error.to_string().contains("no such host"));
    }

    #[test]
    fn test_target_error_messages() {
        let error = TargetError::UnsupportedScheme("ftp".to_string());
        assert_eq!(
            error.to_string(),
            "unsupported URL scheme 'ftp' (expected http or https)"
        );
        let error = TargetError::TooLong {
            length: 3000,
            max: 2048,
        };
        assert!(error.to_string().contains("3000 > 2048"));
    }
}
