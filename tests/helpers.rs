// Shared test helpers for page fixtures and mock-server setup.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test binary uses a different subset

use std::io::Write;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::HeaderMap;

use site_check::{AnalysisTarget, Config, FetchResult, Fetcher};

/// A page that satisfies every SEO, accessibility and mobile rule.
pub const WELL_FORMED_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Acme Widgets: handmade widgets since 1999</title>
  <meta name="description" content="Acme builds durable handmade widgets for homes and workshops, shipped worldwide.">
  <meta name="robots" content="index, follow">
  <meta property="og:title" content="Acme Widgets">
  <meta property="og:description" content="Handmade widgets">
  <meta property="og:image" content="https://acme.example.com/og.png">
  <meta property="og:url" content="https://acme.example.com/">
  <link rel="canonical" href="https://acme.example.com/">
  <link rel="sitemap" type="application/xml" href="/sitemap.xml">
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"Organization","name":"Acme"}</script>
  <style>
    body { font-size: 1rem }
    @media (max-width: 600px) { nav { display: none } }
  </style>
</head>
<body>
  <header><a href="/"><img src="/logo.svg" alt="Acme"></a></header>
  <nav><a href="/widgets">Widgets</a> <a href="https://partner.example.org/">Partner</a></nav>
  <main>
    <h1>Handmade widgets</h1>
    <h2>Catalogue</h2>
    <img src="/widget.jpg" srcset="/widget-2x.jpg 2x" alt="A brass widget">
    <form>
      <label for="email">Email</label><input id="email" type="email">
      <button type="submit">Subscribe</button>
    </form>
  </main>
  <footer><a href="/contact">Contact</a></footer>
</body>
</html>"##;

/// Every security header a hardened site sends.
pub const HARDENED_HEADERS: &[(&str, &str)] = &[
    ("Strict-Transport-Security", "max-age=31536000; includeSubDomains"),
    ("Content-Security-Policy", "default-src 'self'"),
    ("X-Frame-Options", "DENY"),
    ("X-Content-Type-Options", "nosniff"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
];

/// Parses a target, panicking on invalid test input.
pub fn target(url: &str) -> AnalysisTarget {
    AnalysisTarget::parse(url).expect("test target should be valid")
}

/// A captured 200 response for `url`.
pub fn captured_page(url: &str, html: &str, headers: &[(&str, &str)]) -> FetchResult {
    let target = target(url);
    let mut page = FetchResult::from_parts(
        target.url().clone(),
        200,
        HeaderMap::new(),
        html,
        Duration::from_millis(300),
    );
    for (name, value) in headers {
        page = page.with_header(name, value);
    }
    page
}

/// Gzip-compresses `bytes`.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// A fetcher with a test config and the given whole-fetch timeout.
pub fn fetcher(timeout: Duration) -> Fetcher {
    let config = test_config();
    let client = site_check::initialization::init_client(&config).expect("client should build");
    Fetcher::new(client, timeout)
}

/// Quiet, fast config for tests.
pub fn test_config() -> Config {
    Config {
        timeout_seconds: 5,
        user_agent: "site_check-test/1.0".to_string(),
        ..Default::default()
    }
}
