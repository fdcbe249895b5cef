//! Accessibility checklist, based on static markup only.

use std::sync::LazyLock;

use regex::Regex;

use super::{percent, Analyzer, Check, PageContext, Rule, RuleResult};
use crate::models::Category;

/// Scores language, ARIA usage, labelling, alt text and page structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibilityAnalyzer;

/// `en`, `fr-CA`, `zh-Hant-TW` and similar BCP 47 shapes.
static LANG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$")
        .unwrap_or_else(|e| panic!("Failed to compile language tag regex: {e}"))
});

/// Non-abstract WAI-ARIA 1.2 roles.
const ARIA_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button",
    "caption", "cell", "checkbox", "code", "columnheader", "combobox", "complementary",
    "contentinfo", "definition", "deletion", "dialog", "directory", "document", "emphasis",
    "feed", "figure", "form", "generic", "grid", "gridcell", "group", "heading", "img",
    "insertion", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "meter",
    "navigation", "none", "note", "option", "paragraph", "presentation", "progressbar",
    "radio", "radiogroup", "region", "row", "rowgroup", "rowheader", "scrollbar", "search",
    "searchbox", "separator", "slider", "spinbutton", "status", "strong", "subscript",
    "superscript", "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox",
    "time", "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

/// Landmarks that accompany `main` on a well-structured page.
const SECONDARY_LANDMARKS: &[&str] = &["banner", "navigation", "contentinfo"];

const RULES: &[Rule] = &[
    Rule {
        key: "lang",
        label: "Document language",
        weight: 15,
        check: lang,
    },
    Rule {
        key: "aria",
        label: "ARIA usage",
        weight: 10,
        check: aria,
    },
    Rule {
        key: "form_labels",
        label: "Form labels",
        weight: 20,
        check: form_labels,
    },
    Rule {
        key: "image_alt",
        label: "Text alternatives",
        weight: 20,
        check: image_alt,
    },
    Rule {
        key: "landmarks",
        label: "Landmarks",
        weight: 15,
        check: landmarks,
    },
    Rule {
        key: "accessible_names",
        label: "Link and button names",
        weight: 15,
        check: accessible_names,
    },
    Rule {
        key: "page_title",
        label: "Page title",
        weight: 5,
        check: page_title,
    },
];

impl Analyzer for AccessibilityAnalyzer {
    fn category(&self) -> Category {
        Category::Accessibility
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

fn lang(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.lang.as_deref() {
        Some(lang) if LANG_TAG_RE.is_match(lang) => Check::pass_with(format!("lang=\"{lang}\"")),
        Some(lang) => Check::warn(format!("lang=\"{lang}\" is not a valid language tag")),
        None => Check::fail("<html> has no lang attribute"),
    })
}

fn aria(ctx: &PageContext<'_>) -> RuleResult {
    let document = ctx.document;
    if !document.aria_hidden_focusable.is_empty() {
        return Ok(Check::fail(format!(
            "{} focusable elements inside aria-hidden=\"true\"",
            document.aria_hidden_focusable.len()
        )));
    }

    let mut problems = Vec::new();
    let invalid_roles: Vec<&str> = document
        .roles
        .iter()
        .map(String::as_str)
        .filter(|role| !ARIA_ROLES.contains(role))
        .collect();
    if !invalid_roles.is_empty() {
        problems.push(format!("unknown roles: {}", invalid_roles.join(", ")));
    }
    let dangling = document
        .aria
        .iter()
        .filter(|a| a.name == "aria-labelledby" || a.name == "aria-describedby")
        .flat_map(|a| a.value.split_ascii_whitespace())
        .filter(|id| !document.ids.contains(*id))
        .count();
    if dangling > 0 {
        problems.push(format!("{dangling} aria references point to missing ids"));
    }

    Ok(if problems.is_empty() {
        Check::pass()
    } else {
        Check::warn(problems.join("; "))
    })
}

fn form_labels(ctx: &PageContext<'_>) -> RuleResult {
    let controls = &ctx.document.controls;
    if controls.is_empty() {
        return Ok(Check::pass_with("No form controls"));
    }
    let unlabelled: Vec<_> = controls.iter().filter(|c| !c.has_label).collect();
    let placeholder_only = unlabelled.iter().filter(|c| c.has_placeholder).count();
    let labelled = controls.len() - unlabelled.len();
    let mut detail = format!("{labelled}/{} form controls have a label", controls.len());
    if placeholder_only > 0 {
        detail.push_str(&format!("; {placeholder_only} rely on a placeholder only"));
    }
    Ok(match percent(labelled, controls.len()) {
        100 => Check::pass_with(detail),
        50.. => Check::warn(detail),
        _ => Check::fail(detail),
    })
}

fn image_alt(ctx: &PageContext<'_>) -> RuleResult {
    let images = &ctx.document.images;
    if images.is_empty() {
        return Ok(Check::pass_with("No images"));
    }
    let with_alt = images.iter().filter(|image| image.has_alt()).count();
    let detail = format!("{with_alt}/{} images have an alt attribute", images.len());
    Ok(match percent(with_alt, images.len()) {
        100 => Check::pass_with(detail),
        80.. => Check::warn(detail),
        _ => Check::fail(detail),
    })
}

fn landmarks(ctx: &PageContext<'_>) -> RuleResult {
    let present = &ctx.document.landmarks;
    let has_main = present.contains("main");
    let secondary: Vec<&str> = SECONDARY_LANDMARKS
        .iter()
        .copied()
        .filter(|landmark| present.contains(landmark))
        .collect();
    Ok(match (has_main, secondary.is_empty()) {
        (true, false) => Check::pass_with(format!("main, {}", secondary.join(", "))),
        (true, true) => Check::warn("Only a main landmark; add header, nav or footer"),
        (false, false) => Check::warn(format!(
            "No main landmark (found {})",
            secondary.join(", ")
        )),
        (false, true) => Check::fail("No landmarks; use main, header, nav and footer"),
    })
}

fn accessible_names(ctx: &PageContext<'_>) -> RuleResult {
    let interactive = &ctx.document.interactive;
    let unnamed: Vec<&str> = interactive
        .iter()
        .filter(|element| !element.has_accessible_name)
        .map(|element| element.tag.as_str())
        .collect();
    if unnamed.is_empty() {
        return Ok(Check::pass());
    }
    let detail = format!(
        "{} of {} links and buttons have no accessible name",
        unnamed.len(),
        interactive.len()
    );
    // tolerate one unnamed control in five before failing
    Ok(if unnamed.len() * 5 <= interactive.len() {
        Check::warn(detail)
    } else {
        Check::fail(detail)
    })
}

fn page_title(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.title.as_deref() {
        Some(_) => Check::pass(),
        None => Check::fail("Missing <title>; screen readers announce it first"),
    })
}
