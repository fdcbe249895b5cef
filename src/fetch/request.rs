//! Outbound request headers.

/// `Accept` value sent by a desktop Chrome navigation.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Encodings the fetcher can decode itself.
pub(crate) const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Browser-like request headers.
///
/// Sites are audited as a visitor would see them, so the navigation headers
/// mirror a modern browser. `accept-encoding` advertises only the codings
/// `decode::decode_body` understands.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Headers as `(name, value)` pairs, used for debug logging.
    pub(crate) fn as_vec() -> Vec<(&'static str, &'static str)> {
        vec![
            ("accept", ACCEPT_HTML),
            ("accept-language", "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7"),
            ("accept-encoding", ACCEPT_ENCODING),
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-user", "?1"),
            ("upgrade-insecure-requests", "1"),
            ("cache-control", "no-cache"),
        ]
    }

    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(
                reqwest::header::ACCEPT_LANGUAGE,
                "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7",
            )
            .header(reqwest::header::ACCEPT_ENCODING, ACCEPT_ENCODING)
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-dest"),
                "document",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-mode"),
                "navigate",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-site"),
                "none",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-user"),
                "?1",
            )
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
    }
}
