//! Head and content extraction: title, meta, headings, images, scripts.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{Heading, Image, LinkRel, Script, Subresource};
use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("title", "title extraction"));
static HTML_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("html", "lang extraction"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("meta", "meta extraction"));
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("h1, h2, h3, h4, h5, h6", "heading extraction")
});
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("img", "image extraction"));
static PICTURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("picture", "picture detection"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("link[rel]", "link rel extraction"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("script", "script extraction"));
static SUBRESOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(
        "img[src], script[src], iframe[src], source[src], video[src], audio[src], embed[src], object[data], link[href]",
        "sub-resource extraction",
    )
});

/// `<link rel>` tokens whose target the browser fetches.
const FETCHED_LINK_RELS: &[&str] = &[
    "stylesheet",
    "icon",
    "preload",
    "modulepreload",
    "manifest",
    "apple-touch-icon",
];

pub(super) fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).map(str::trim)
}

pub(super) fn is_inside(element: &ElementRef<'_>, ancestor: &str) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| e.name() == ancestor)
    })
}

/// First `<title>` outside inline SVG, where `<title>` is a tooltip.
pub(super) fn extract_title(document: &Html) -> Option<String> {
    let title = document
        .select(&TITLE_SELECTOR)
        .find(|element| !is_inside(element, "svg"))
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))?;
    if title.is_empty() {
        log::debug!("Empty title element in document");
        None
    } else {
        Some(title)
    }
}

pub(super) fn extract_lang(document: &Html) -> Option<String> {
    document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|element| attr(&element, "lang"))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Later tags with the same key overwrite earlier ones.
pub(super) fn extract_meta(document: &Html) -> HashMap<String, String> {
    let mut meta = HashMap::new();
    for element in document.select(&META_SELECTOR) {
        if let Some(charset) = attr(&element, "charset") {
            meta.insert("charset".to_string(), charset.to_string());
        }
        let Some(content) = attr(&element, "content") else {
            continue;
        };
        for key_attr in ["name", "property"] {
            if let Some(key) = attr(&element, key_attr).filter(|k| !k.is_empty()) {
                meta.insert(key.to_ascii_lowercase(), content.to_string());
            }
        }
        if let Some(name) = attr(&element, "http-equiv").filter(|k| !k.is_empty()) {
            meta.insert(
                format!("http-equiv:{}", name.to_ascii_lowercase()),
                content.to_string(),
            );
        }
    }
    meta
}

pub(super) fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|element| {
            let level = element.value().name().strip_prefix('h')?.parse().ok()?;
            Some(Heading {
                level,
                text: collapse_whitespace(&element.text().collect::<String>()),
            })
        })
        .collect()
}

pub(super) fn extract_images(document: &Html) -> Vec<Image> {
    document
        .select(&IMG_SELECTOR)
        .map(|element| Image {
            src: attr(&element, "src")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            alt: element.value().attr("alt").map(|a| a.trim().to_string()),
            has_srcset: element.value().attr("srcset").is_some()
                || element.value().attr("sizes").is_some(),
        })
        .collect()
}

pub(super) fn has_picture(document: &Html) -> bool {
    document.select(&PICTURE_SELECTOR).next().is_some()
}

pub(super) fn extract_link_rels(document: &Html) -> Vec<LinkRel> {
    document
        .select(&LINK_SELECTOR)
        .map(|element| LinkRel {
            rel: attr(&element, "rel")
                .unwrap_or_default()
                .split_ascii_whitespace()
                .map(str::to_ascii_lowercase)
                .collect(),
            href: attr(&element, "href")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            media: attr(&element, "media").map(str::to_string),
        })
        .collect()
}

pub(super) fn extract_scripts(document: &Html) -> Vec<Script> {
    document
        .select(&SCRIPT_SELECTOR)
        .map(|element| {
            let script_type = attr(&element, "type").map(str::to_ascii_lowercase);
            Script {
                src: attr(&element, "src")
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                in_head: is_inside(&element, "head"),
                is_async: element.value().attr("async").is_some(),
                is_defer: element.value().attr("defer").is_some(),
                is_module: script_type.as_deref() == Some("module"),
                script_type,
            }
        })
        .collect()
}

pub(super) fn extract_json_ld(document: &Html) -> Vec<String> {
    document
        .select(&SCRIPT_SELECTOR)
        .filter(|element| {
            attr(element, "type").is_some_and(|t| t.eq_ignore_ascii_case("application/ld+json"))
        })
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

pub(super) fn extract_subresources(document: &Html, base: &Url) -> Vec<Subresource> {
    document
        .select(&SUBRESOURCE_SELECTOR)
        .filter_map(|element| {
            let name = element.value().name();
            let raw = match name {
                "link" => {
                    let rels = attr(&element, "rel").unwrap_or_default().to_ascii_lowercase();
                    let fetched = rels
                        .split_ascii_whitespace()
                        .any(|rel| FETCHED_LINK_RELS.contains(&rel));
                    if !fetched {
                        return None;
                    }
                    attr(&element, "href")?
                }
                "object" => attr(&element, "data")?,
                _ => attr(&element, "src")?,
            };
            if raw.is_empty() || raw.starts_with("data:") {
                return None;
            }
            let url = base.join(raw).ok()?;
            Some(Subresource {
                element: name.to_string(),
                url,
            })
        })
        .collect()
}
