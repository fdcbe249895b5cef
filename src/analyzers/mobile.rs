//! Mobile friendliness: viewport, responsive layout, touch targets, text size.

use super::{Analyzer, Check, PageContext, Rule, RuleResult};
use crate::models::Category;
use crate::parse::css::{self, CssRule, DEFAULT_FONT_SIZE_PX};
use crate::parse::StyleAttribute;

/// Scores how well the page adapts to small screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileAnalyzer;

/// Class prefixes of common responsive grid frameworks (Bootstrap, Tailwind, Foundation, Bulma).
const RESPONSIVE_CLASS_PREFIXES: &[&str] = &[
    "col-sm", "col-md", "col-lg", "col-xl", "sm:", "md:", "lg:", "xl:", "small-", "medium-",
    "large-", "is-mobile", "is-hidden-mobile", "d-md-", "d-lg-", "d-none",
];

/// Selectors treated as styling interactive elements.
const TOUCH_SELECTORS: &[&str] = &["a", "button", "input", "select", "textarea", ".btn", ".button"];

const RULES: &[Rule] = &[
    Rule {
        key: "viewport",
        label: "Viewport meta",
        weight: 30,
        check: viewport,
    },
    Rule {
        key: "device_width",
        label: "Device-width layout",
        weight: 15,
        check: device_width,
    },
    Rule {
        key: "zoom",
        label: "Pinch zoom",
        weight: 10,
        check: zoom,
    },
    Rule {
        key: "responsive_layout",
        label: "Responsive layout",
        weight: 20,
        check: responsive_layout,
    },
    Rule {
        key: "touch_targets",
        label: "Touch targets",
        weight: 10,
        check: touch_targets,
    },
    Rule {
        key: "base_font_size",
        label: "Base font size",
        weight: 15,
        check: base_font_size,
    },
];

impl Analyzer for MobileAnalyzer {
    fn category(&self) -> Category {
        Category::Mobile
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

/// `width=device-width, initial-scale=1` as lowercased `(key, value)` pairs.
fn viewport_directives(content: &str) -> Vec<(String, String)> {
    content
        .split([',', ';'])
        .filter_map(|directive| {
            let (key, value) = directive.split_once('=')?;
            Some((
                key.trim().to_ascii_lowercase(),
                value.trim().to_ascii_lowercase(),
            ))
        })
        .collect()
}

fn directive<'a>(directives: &'a [(String, String)], key: &str) -> Option<&'a str> {
    directives
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn viewport(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.viewport().map(str::trim) {
        Some(content) if !content.is_empty() => Check::pass_with(content.to_string()),
        _ => Check::fail("Missing <meta name=\"viewport\">"),
    })
}

fn device_width(ctx: &PageContext<'_>) -> RuleResult {
    let Some(content) = ctx.document.viewport() else {
        return Ok(Check::fail("No viewport; mobile browsers render a 980px desktop layout"));
    };
    let directives = viewport_directives(content);
    Ok(match directive(&directives, "width") {
        Some("device-width") => Check::pass(),
        Some(width) => Check::fail(format!("Viewport has a fixed width={width}")),
        None => Check::warn("Viewport does not set width=device-width"),
    })
}

fn zoom(ctx: &PageContext<'_>) -> RuleResult {
    let Some(content) = ctx.document.viewport() else {
        return Ok(Check::pass_with("Zoom is not restricted"));
    };
    let directives = viewport_directives(content);
    if matches!(directive(&directives, "user-scalable"), Some("no" | "0")) {
        return Ok(Check::warn("user-scalable=no prevents pinch zoom"));
    }
    let maximum_scale = directive(&directives, "maximum-scale").and_then(|v| v.parse::<f32>().ok());
    Ok(match maximum_scale {
        Some(scale) if scale < 2.0 => {
            Check::warn(format!("maximum-scale={scale} limits zoom; allow at least 2"))
        }
        _ => Check::pass(),
    })
}

fn responsive_layout(ctx: &PageContext<'_>) -> RuleResult {
    let document = ctx.document;
    let media_queries = document.media_query_count();
    let framework = document.class_tokens.iter().any(|class| {
        RESPONSIVE_CLASS_PREFIXES
            .iter()
            .any(|prefix| class.starts_with(prefix))
    });
    let responsive_images = document.has_picture || document.images.iter().any(|i| i.has_srcset);

    let mut signals = Vec::new();
    if media_queries > 0 {
        signals.push(format!("{media_queries} media queries"));
    }
    if framework {
        signals.push("responsive grid classes".to_string());
    }
    if responsive_images {
        signals.push("srcset or <picture> images".to_string());
    }

    Ok(if media_queries > 0 || framework {
        Check::pass_with(signals.join(", "))
    } else if responsive_images {
        Check::warn("Responsive images but no media queries or responsive grid")
    } else if !document.stylesheets.is_empty() {
        Check::warn("No responsive signals in the markup; external stylesheets were not inspected")
    } else {
        Check::fail("No media queries, responsive classes or responsive images")
    })
}

/// Smallest edge an element's declarations give it, in CSS px.
fn smallest_edge(declarations: &[(String, String)]) -> Option<f32> {
    let value = |property: &str| {
        declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .and_then(|(_, value)| css::length_px(value))
    };
    let edge = |size: Option<f32>, minimum: Option<f32>| match (size, minimum) {
        (Some(size), Some(minimum)) => Some(size.max(minimum)),
        (size, minimum) => size.or(minimum),
    };
    let width = edge(value("width"), value("min-width"));
    let height = edge(value("height"), value("min-height"));
    match (width, height) {
        (Some(w), Some(h)) => Some(w.min(h)),
        (w, h) => w.or(h),
    }
}

fn targets_interactive(rule: &CssRule) -> bool {
    rule.selectors.iter().any(|selector| {
        let last = selector
            .rsplit([' ', '>', '+', '~'])
            .next()
            .unwrap_or(selector)
            .split(':')
            .next()
            .unwrap_or_default();
        TOUCH_SELECTORS
            .iter()
            .any(|touch| last == *touch || last.starts_with(&format!("{touch}.")))
    })
}

fn touch_targets(ctx: &PageContext<'_>) -> RuleResult {
    let minimum = ctx.thresholds.min_touch_target_px;
    let inline = ctx
        .document
        .style_attributes
        .iter()
        .filter(|attribute| attribute.interactive)
        .filter_map(|StyleAttribute { style, .. }| smallest_edge(&css::declarations(style)));
    let stylesheet = ctx
        .document
        .inline_css
        .iter()
        .flat_map(|sheet| css::rules(sheet))
        .filter(targets_interactive)
        .filter_map(|rule| smallest_edge(&rule.declarations));
    let undersized = inline.chain(stylesheet).filter(|edge| *edge < minimum).count();

    Ok(match undersized {
        0 => Check::pass(),
        1 | 2 => Check::warn(format!(
            "{undersized} interactive elements are sized under {minimum}px"
        )),
        n => Check::fail(format!("{n} interactive elements are sized under {minimum}px")),
    })
}

fn is_root_selector(selector: &str) -> bool {
    matches!(selector, "html" | ":root")
}

fn is_relative(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    value.ends_with("em") || value.ends_with('%')
}

/// Root and body font sizes declared in `<style>` blocks and `style` attributes.
fn declared_font_sizes(ctx: &PageContext<'_>) -> (Option<f32>, Option<(String, f32)>) {
    let mut root = None;
    let mut body = None;
    let mut record = |element: &str, declarations: &[(String, String)]| {
        for (property, value) in declarations {
            let size = match property.as_str() {
                "font-size" => css::font_size_px(value),
                "font" => css::font_shorthand_size_px(value),
                _ => None,
            };
            if let Some(size) = size {
                if is_root_selector(element) {
                    root = Some(size);
                } else {
                    body = Some((value.clone(), size));
                }
            }
        }
    };
    for sheet in &ctx.document.inline_css {
        for rule in css::rules(sheet) {
            for selector in &rule.selectors {
                if is_root_selector(selector) || selector == "body" {
                    record(selector, &rule.declarations);
                }
            }
        }
    }
    // style attributes win over stylesheet rules
    for attribute in &ctx.document.style_attributes {
        if matches!(attribute.element.as_str(), "html" | "body") {
            record(&attribute.element, &css::declarations(&attribute.style));
        }
    }
    (root, body)
}

fn base_font_size(ctx: &PageContext<'_>) -> RuleResult {
    let (root, body) = declared_font_sizes(ctx);
    let root_px = root.unwrap_or(DEFAULT_FONT_SIZE_PX);
    let size = match body {
        Some((value, px)) if is_relative(&value) => px * root_px / DEFAULT_FONT_SIZE_PX,
        Some((_, px)) => px,
        None => root_px,
    };
    let thresholds = ctx.thresholds;
    let detail = format!("Base font size is {size:.1}px");
    Ok(if size < thresholds.min_font_size_px {
        Check::fail(format!("{detail}; text is hard to read below {}px", thresholds.min_font_size_px))
    } else if size < thresholds.recommended_font_size_px {
        Check::warn(format!("{detail}; {}px is recommended", thresholds.recommended_font_size_px))
    } else {
        Check::pass_with(detail)
    })
}
