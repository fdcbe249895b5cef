//! HTTP header name constants.
//!
//! Header names are lowercase so they can be used directly with
//! `reqwest::header::HeaderMap::get`, which matches case-insensitively.

// Security header names
/// Content Security Policy header
pub const HEADER_CONTENT_SECURITY_POLICY: &str = "content-security-policy";
/// HTTP Strict Transport Security header
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
/// X-Content-Type-Options header
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
/// X-Frame-Options header
pub const HEADER_X_FRAME_OPTIONS: &str = "x-frame-options";
/// Referrer-Policy header
pub const HEADER_REFERRER_POLICY: &str = "referrer-policy";
/// Permissions-Policy header
pub const HEADER_PERMISSIONS_POLICY: &str = "permissions-policy";

/// Security headers surfaced in reports.
pub const SECURITY_HEADERS: &[&str] = &[
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_CONTENT_TYPE_OPTIONS,
    HEADER_X_FRAME_OPTIONS,
    HEADER_REFERRER_POLICY,
    HEADER_PERMISSIONS_POLICY,
];

// Performance/Caching
/// Content-Encoding header (compression)
pub const HEADER_CONTENT_ENCODING: &str = "content-encoding";
/// Cache-Control header
pub const HEADER_CACHE_CONTROL: &str = "cache-control";
/// ETag header
pub const HEADER_ETAG: &str = "etag";
/// Last-Modified header
pub const HEADER_LAST_MODIFIED: &str = "last-modified";
/// Expires header
pub const HEADER_EXPIRES: &str = "expires";

/// Headers that make a response cacheable by browsers.
pub const CACHING_HEADERS: &[&str] = &[
    HEADER_CACHE_CONTROL,
    HEADER_ETAG,
    HEADER_LAST_MODIFIED,
    HEADER_EXPIRES,
];
