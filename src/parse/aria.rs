//! ARIA attributes, landmarks and accessible names.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::document::attr;
use super::{AriaAttribute, Interactive};
use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

static ALL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("*", "element walk"));
static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("[id]", "id extraction"));
static ROLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("[role]", "role extraction"));
static LANDMARK_ELEMENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("main, header, nav, footer, aside, search", "landmark extraction")
});
static INTERACTIVE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(
        "a[href], button, input[type=button], input[type=submit], input[type=reset], [role=button], [role=link]",
        "interactive element extraction",
    )
});
static ARIA_HIDDEN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(r#"[aria-hidden="true"]"#, "aria-hidden extraction")
});

/// Landmark roles, by canonical name.
const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "complementary",
    "contentinfo",
    "form",
    "main",
    "navigation",
    "region",
    "search",
];

fn landmark_for_element(name: &str) -> Option<&'static str> {
    match name {
        "main" => Some("main"),
        "header" => Some("banner"),
        "nav" => Some("navigation"),
        "footer" => Some("contentinfo"),
        "aside" => Some("complementary"),
        "search" => Some("search"),
        _ => None,
    }
}

pub(super) fn extract_ids(document: &Html) -> HashSet<String> {
    document
        .select(&ID_SELECTOR)
        .filter_map(|element| attr(&element, "id"))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn extract_aria_attributes(document: &Html) -> Vec<AriaAttribute> {
    let mut found = Vec::new();
    for element in document.select(&ALL_SELECTOR) {
        for (name, value) in element.value().attrs() {
            if name.starts_with("aria-") {
                found.push(AriaAttribute {
                    element: element.value().name().to_string(),
                    name: name.to_ascii_lowercase(),
                    value: value.trim().to_string(),
                });
            }
        }
    }
    found
}

pub(super) fn extract_roles(document: &Html) -> Vec<String> {
    document
        .select(&ROLE_SELECTOR)
        .filter_map(|element| attr(&element, "role"))
        .flat_map(str::split_ascii_whitespace)
        .map(str::to_ascii_lowercase)
        .collect()
}

pub(super) fn extract_landmarks(document: &Html) -> BTreeSet<&'static str> {
    let mut landmarks: BTreeSet<&'static str> = document
        .select(&LANDMARK_ELEMENT_SELECTOR)
        .filter_map(|element| landmark_for_element(element.value().name()))
        .collect();
    for role in extract_roles(document) {
        if let Some(known) = LANDMARK_ROLES.iter().find(|known| **known == role) {
            landmarks.insert(*known);
        }
    }
    landmarks
}

fn has_accessible_name(element: &ElementRef<'_>, ids: &HashSet<String>) -> bool {
    let non_empty = |name: &str| attr(element, name).is_some_and(|v| !v.is_empty());
    if non_empty("aria-label") || non_empty("title") {
        return true;
    }
    if attr(element, "aria-labelledby").is_some_and(|refs| {
        refs.split_ascii_whitespace()
            .any(|id| ids.contains(id))
    }) {
        return true;
    }
    if element.value().name() == "input" {
        let input_type = attr(element, "type").unwrap_or_default().to_ascii_lowercase();
        // Submit and reset buttons get a default label from the browser
        return non_empty("value") || matches!(input_type.as_str(), "submit" | "reset");
    }
    if !collapse_whitespace(&element.text().collect::<String>()).is_empty() {
        return true;
    }
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|child| {
            child.value().name() == "img" && attr(&child, "alt").is_some_and(|alt| !alt.is_empty())
        })
}

pub(super) fn extract_interactive(document: &Html, ids: &HashSet<String>) -> Vec<Interactive> {
    document
        .select(&INTERACTIVE_SELECTOR)
        .map(|element| Interactive {
            tag: element.value().name().to_string(),
            has_accessible_name: has_accessible_name(&element, ids),
        })
        .collect()
}

fn is_focusable(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("disabled").is_some() {
        return false;
    }
    if let Some(tabindex) = attr(element, "tabindex") {
        return !tabindex.starts_with('-');
    }
    match value.name() {
        "a" | "area" => value.attr("href").is_some(),
        "input" => !attr(element, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        "button" | "select" | "textarea" | "iframe" => true,
        _ => false,
    }
}

pub(super) fn extract_aria_hidden_focusable(document: &Html) -> Vec<String> {
    let mut found = Vec::new();
    for hidden in document.select(&ARIA_HIDDEN_SELECTOR) {
        for element in hidden.descendants().filter_map(ElementRef::wrap) {
            if is_focusable(&element) {
                found.push(element.value().name().to_string());
            }
        }
    }
    found
}
