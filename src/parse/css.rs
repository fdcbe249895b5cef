//! Inline CSS extraction and a small declaration parser.
//!
//! Only what the mobile and performance heuristics need: flat rule blocks,
//! `property: value` pairs, `@media` counting and length conversion. Nested
//! at-rules are flattened to their innermost blocks.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::document::attr;
use super::StyleAttribute;
use crate::utils::parse_selector_with_fallback;

static STYLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("style", "inline CSS extraction"));
static STYLE_ATTR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("[style]", "style attribute extraction"));
static CLASS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("[class]", "class extraction"));

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?s)/\*.*?\*/"));
static RULE_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"([^{}]+)\{([^{}]*)\}"));
static MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?i)@media\b"));

fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!("Failed to compile CSS regex '{pattern}': {e}. This is a programming error.")
    })
}

/// Browser default root font size in CSS px.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// One `selectors { declarations }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    /// Lowercased selectors of the block
    pub selectors: Vec<String>,
    /// `(property, value)` pairs, properties lowercased
    pub declarations: Vec<(String, String)>,
}

impl CssRule {
    /// Last value declared for `property`.
    pub fn value(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Splits a stylesheet into rule blocks.
pub fn rules(css: &str) -> Vec<CssRule> {
    let css = COMMENT_RE.replace_all(css, "");
    RULE_RE
        .captures_iter(&css)
        .filter_map(|captures| {
            // `@import …; body` keeps only the part after the last statement
            let prelude = captures[1].rsplit(';').next().unwrap_or_default().trim();
            if prelude.is_empty() || prelude.starts_with('@') {
                return None;
            }
            Some(CssRule {
                selectors: prelude
                    .split(',')
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
                declarations: declarations(&captures[2]),
            })
        })
        .collect()
}

/// Parses `a: b; c: d` into pairs, dropping `!important`.
pub fn declarations(block: &str) -> Vec<(String, String)> {
    block
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value);
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}

/// Number of `@media` rules.
pub fn media_query_count(css: &str) -> usize {
    MEDIA_RE.find_iter(&COMMENT_RE.replace_all(css, "")).count()
}

/// Converts an absolute or root-relative length to CSS px.
///
/// `em` is treated like `rem`. Percentages, viewport units and functions yield `None`.
pub fn length_px(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    if value == "0" {
        return Some(0.0);
    }
    let units: [(&str, f32); 6] = [
        ("rem", DEFAULT_FONT_SIZE_PX),
        ("em", DEFAULT_FONT_SIZE_PX),
        ("px", 1.0),
        ("pt", 4.0 / 3.0),
        ("pc", 16.0),
        ("mm", 96.0 / 25.4),
    ];
    units.iter().find_map(|(unit, factor)| {
        value
            .strip_suffix(unit)
            .and_then(|number| number.trim().parse::<f32>().ok())
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n * factor)
    })
}

/// Converts a `font-size` value to CSS px.
pub fn font_size_px(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let keyword = match value.as_str() {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(16.0),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        _ => None,
    };
    if keyword.is_some() {
        return keyword;
    }
    if let Some(percent) = value.strip_suffix('%') {
        return percent
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p / 100.0 * DEFAULT_FONT_SIZE_PX);
    }
    length_px(&value)
}

/// Font size set by a `font` shorthand (`14px/1.5 Arial` → 14).
pub fn font_shorthand_size_px(value: &str) -> Option<f32> {
    value
        .split_ascii_whitespace()
        .map(|token| token.split('/').next().unwrap_or(token))
        .find_map(font_size_px)
}

pub(super) fn extract_inline_css(document: &Html) -> Vec<String> {
    document
        .select(&STYLE_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .filter(|css| !css.trim().is_empty())
        .collect()
}

pub(super) fn extract_style_attributes(document: &Html) -> Vec<StyleAttribute> {
    document
        .select(&STYLE_ATTR_SELECTOR)
        .filter_map(|element| {
            let style = attr(&element, "style").filter(|s| !s.is_empty())?;
            let name = element.value().name();
            let interactive = matches!(name, "a" | "button" | "input" | "select" | "textarea")
                || attr(&element, "role")
                    .is_some_and(|role| matches!(role, "button" | "link"));
            Some(StyleAttribute {
                element: name.to_string(),
                style: style.to_string(),
                interactive,
            })
        })
        .collect()
}

pub(super) fn extract_class_tokens(document: &Html) -> HashSet<String> {
    document
        .select(&CLASS_SELECTOR)
        .flat_map(|element| element.value().classes().map(str::to_string).collect::<Vec<_>>())
        .collect()
}
