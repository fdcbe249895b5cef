//! Analysis target validation and normalization.

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Serialize, Serializer};
use url::{Host, Url};

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::TargetError;

/// Matches an explicit `scheme://` prefix.
static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z][a-z0-9+.\-]*)://").unwrap_or_else(|e| {
        panic!("Failed to compile scheme regex: {e}. This is a programming error.")
    })
});

/// Matches a `scheme:` prefix without `//` (e.g. `mailto:`), but not `host:port`.
static OPAQUE_SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z][a-z0-9+.\-]*):(?:[^0-9]|$)").unwrap_or_else(|e| {
        panic!("Failed to compile opaque scheme regex: {e}. This is a programming error.")
    })
});

/// A validated absolute `http`/`https` URL. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisTarget {
    url: Url,
}

impl AnalysisTarget {
    /// Validates and normalizes user input.
    ///
    /// Trims whitespace, adds an `https://` prefix when no scheme is given, then
    /// checks that the result parses, uses http/https, and names a host with no
    /// empty labels (any domain, including single-label intranet names, or an
    /// IP address). Input longer than
    /// `MAX_URL_LENGTH` is rejected before and after normalization.
    ///
    /// # Errors
    ///
    /// Returns a `TargetError` describing why the input was rejected.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }
        if trimmed.len() > MAX_URL_LENGTH {
            return Err(TargetError::TooLong {
                length: trimmed.len(),
                max: MAX_URL_LENGTH,
            });
        }

        let normalized = match SCHEME_PREFIX.captures(trimmed) {
            Some(captures) => {
                let scheme = captures[1].to_ascii_lowercase();
                if scheme != "http" && scheme != "https" {
                    return Err(TargetError::UnsupportedScheme(scheme));
                }
                trimmed.to_string()
            }
            None => {
                if let Some(captures) = OPAQUE_SCHEME_PREFIX.captures(trimmed) {
                    let scheme = captures[1].to_ascii_lowercase();
                    if scheme == "http" || scheme == "https" {
                        return Err(TargetError::Malformed {
                            input: trimmed.to_string(),
                            reason: "expected '//' after the scheme".to_string(),
                        });
                    }
                    return Err(TargetError::UnsupportedScheme(scheme));
                }
                format!("https://{trimmed}")
            }
        };

        if normalized.len() > MAX_URL_LENGTH {
            return Err(TargetError::TooLong {
                length: normalized.len(),
                max: MAX_URL_LENGTH,
            });
        }

        let url = Url::parse(&normalized).map_err(|e| TargetError::Malformed {
            input: normalized.clone(),
            reason: e.to_string(),
        })?;

        match url.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.trim_end_matches('.');
                if domain.is_empty() || domain.split('.').any(str::is_empty) {
                    return Err(TargetError::InvalidHost(domain.to_string()));
                }
            }
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
            None => {
                return Err(TargetError::Malformed {
                    input: normalized,
                    reason: "missing host".to_string(),
                })
            }
        }

        Ok(Self { url })
    }

    /// Builds a target from a route parameter, percent-decoding it first.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::Malformed` if the decoded bytes are not UTF-8, or
    /// any error `parse` returns.
    pub fn from_route_param(raw: &str) -> Result<Self, TargetError> {
        let decoded = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|e| TargetError::Malformed {
                input: raw.to_string(),
                reason: e.to_string(),
            })?;
        Self::parse(&decoded)
    }

    /// The normalized URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The normalized URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Host name (or IP literal) of the target.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Whether the target uses HTTPS.
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }
}

impl fmt::Display for AnalysisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnalysisTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adds_https() {
        let target = AnalysisTarget::parse("example.com").unwrap();
        assert_eq!(target.as_str(), "https://example.com/");
        assert!(target.is_https());
    }

    #[test]
    fn test_parse_preserves_http() {
        let target = AnalysisTarget::parse("http://example.com/page").unwrap();
        assert_eq!(target.as_str(), "http://example.com/page");
        assert!(!target.is_https());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let target = AnalysisTarget::parse("  https://example.com  ").unwrap();
        assert_eq!(target.host(), "example.com");
    }

    #[test]
    fn test_parse_uppercase_scheme() {
        let target = AnalysisTarget::parse("HTTPS://Example.com").unwrap();
        assert_eq!(target.as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_with_path_and_port() {
        let target = AnalysisTarget::parse("example.com:8080/path?query=value").unwrap();
        assert_eq!(target.as_str(), "https://example.com:8080/path?query=value");
    }

    #[test]
    fn test_parse_accepts_localhost_and_ip() {
        assert!(AnalysisTarget::parse("http://localhost:3000").is_ok());
        let target = AnalysisTarget::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(target.host(), "127.0.0.1");
        let target = AnalysisTarget::parse("http://[::1]:8080/").unwrap();
        assert_eq!(target.host(), "[::1]");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(AnalysisTarget::parse("   "), Err(TargetError::Empty));
    }

    #[test]
    fn test_parse_rejects_unsupported_scheme() {
        assert_eq!(
            AnalysisTarget::parse("ftp://example.com"),
            Err(TargetError::UnsupportedScheme("ftp".to_string()))
        );
        assert_eq!(
            AnalysisTarget::parse("mailto:someone@example.com"),
            Err(TargetError::UnsupportedScheme("mailto".to_string()))
        );
        assert!(matches!(
            AnalysisTarget::parse("http:example.com"),
            Err(TargetError::Malformed { .. })
        ));
        assert!(matches!(
            AnalysisTarget::parse("javascript://alert(1)"),
            Err(TargetError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            AnalysisTarget::parse("not a url at all!!!"),
            Err(TargetError::Malformed { .. })
        ));
        assert!(AnalysisTarget::parse("https://").is_err());
        assert!(AnalysisTarget::parse("example..com").is_err());
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            AnalysisTarget::parse(&url),
            Err(TargetError::TooLong { .. })
        ));
    }

    #[test]
    fn test_from_route_param_percent_decodes() {
        let target = AnalysisTarget::from_route_param("https%3A%2F%2Fexample.com%2Fblog").unwrap();
        assert_eq!(target.as_str(), "https://example.com/blog");
    }

    #[test]
    fn test_from_route_param_rejects_invalid_utf8() {
        assert!(matches!(
            AnalysisTarget::from_route_param("%FF%FE"),
            Err(TargetError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_accepts_single_label_hosts() {
        for (input, host) in [
            ("http://intranet/", "intranet"),
            ("https://example", "example"),
            ("http://my-server:8080/x", "my-server"),
            ("garbage", "garbage"),
        ] {
            let target = AnalysisTarget::parse(input).unwrap();
            assert_eq!(target.host(), host, "{input}");
        }
    }

    #[test]
    fn test_target_serializes_as_string() {
        let target = AnalysisTarget::parse("example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&target).unwrap(),
            "\"https://example.com/\""
        );
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_normalization_idempotent(host in "[a-z]{3,20}\\.[a-z]{2,5}") {
            let first = AnalysisTarget::parse(&host).unwrap();
            let second = AnalysisTarget::parse(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_valid_http_urls_accepted(
            scheme in "https?",
            host in "[a-z]{3,20}\\.[a-z]{2,5}",
            path in prop::collection::vec("[a-z0-9]{1,10}", 0..10)
        ) {
            let url = format!("{}://{}/{}", scheme, host, path.join("/"));
            prop_assert!(AnalysisTarget::parse(&url).is_ok());
        }

        #[test]
        fn test_other_schemes_rejected(
            scheme in "(ftp|file|ws|wss|data|gopher)",
            host in "[a-z]{3,20}\\.[a-z]{2,5}"
        ) {
            let url = format!("{}://{}/", scheme, host);
            prop_assert!(matches!(
                AnalysisTarget::parse(&url),
                Err(TargetError::UnsupportedScheme(_))
            ));
        }

        #[test]
        fn test_whitespace_inside_host_rejected(a in "[a-z]{2,10}", b in "[a-z]{2,10}") {
            let url = format!("{} {}.com", a, b);
            prop_assert!(AnalysisTarget::parse(&url).is_err());
        }
    }
}
