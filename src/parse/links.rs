//! Anchor extraction and classification.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::Link;
use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "link extraction"));

/// Where a link points, relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same host (a leading `www.` is ignored)
    Internal,
    /// Another http(s) host
    External,
    /// `#fragment` on the same page
    Fragment,
    /// `mailto:` or `tel:`
    Mail,
    /// `javascript:` pseudo-link
    Script,
    /// Empty, unresolvable or non-web scheme
    Other,
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Classifies `href` as seen from a page at `base`.
pub fn classify_link(href: &str, base: &Url) -> LinkKind {
    let href = href.trim();
    if href.is_empty() {
        return LinkKind::Other;
    }
    if href.starts_with('#') {
        return LinkKind::Fragment;
    }
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return LinkKind::Mail;
    }
    if lower.starts_with("javascript:") {
        return LinkKind::Script;
    }

    match base.join(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let same_host = match (url.host_str(), base.host_str()) {
                (Some(a), Some(b)) => strip_www(a).eq_ignore_ascii_case(strip_www(b)),
                _ => false,
            };
            if same_host {
                LinkKind::Internal
            } else {
                LinkKind::External
            }
        }
        _ => LinkKind::Other,
    }
}

pub(super) fn extract_links(document: &Html, base: &Url) -> Vec<Link> {
    document
        .select(&ANCHOR_SELECTOR)
        .map(|element| {
            let href = element.value().attr("href").unwrap_or_default().trim();
            Link {
                href: href.to_string(),
                text: collapse_whitespace(&element.text().collect::<String>()),
                kind: classify_link(href, base),
                nofollow: element.value().attr("rel").is_some_and(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("nofollow"))
                }),
            }
        })
        .collect()
}
