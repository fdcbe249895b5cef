//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the library,
//! including timeouts, size limits, and scoring thresholds.

use std::time::Duration;

// Network operation timeouts
/// Per-request timeout in seconds (whole request including body)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound accepted for `timeout_seconds`
pub const MAX_TIMEOUT_SECS: u64 = 120;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for HTTP requests.
///
/// Mimics a current desktop Chrome build so that sites serve the same markup
/// a visitor would get. Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size read off the wire in bytes (2MB)
/// Bodies larger than this are truncated; the transfer size is still recorded
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Maximum decoded body size in bytes (10MB), guards against compression bombs
pub const MAX_DECODED_BODY_SIZE: usize = 10 * 1024 * 1024;
/// Maximum HTML preview length in characters for debugging (500 chars)
pub const MAX_HTML_PREVIEW_CHARS: usize = 500;

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

// URL validation
/// Maximum accepted URL length (2048 characters), matching common browser limits
pub const MAX_URL_LENGTH: usize = 2048;

// Performance thresholds
/// Load time considered excellent
pub const LOAD_TIME_GOOD: Duration = Duration::from_secs(1);
/// Load time beyond which the page is penalized in full
pub const LOAD_TIME_ACCEPTABLE: Duration = Duration::from_secs(3);
/// Transfer size considered light (500KB)
pub const PAGE_SIZE_GOOD_BYTES: usize = 500 * 1024;
/// Transfer size beyond which the page is penalized in full (2MB)
pub const PAGE_SIZE_MAX_BYTES: usize = 2 * 1024 * 1024;
/// Referenced resources (scripts + stylesheets + images) considered light
pub const REQUEST_COUNT_GOOD: usize = 25;
/// Referenced resources beyond which the page is penalized in full
pub const REQUEST_COUNT_MAX: usize = 60;

// SEO copy lengths (characters)
pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

// Mobile heuristics (CSS pixels)
/// Minimum touch target edge length
pub const MIN_TOUCH_TARGET_PX: f32 = 44.0;
/// Base font size below which text is unreadable on phones
pub const MIN_FONT_SIZE_PX: f32 = 12.0;
/// Recommended base font size
pub const RECOMMENDED_FONT_SIZE_PX: f32 = 16.0;
