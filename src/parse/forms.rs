//! Form control labelling.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::document::{attr, is_inside};
use super::FormControl;
use crate::utils::parse_selector_with_fallback;

static LABEL_FOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("label[for]", "label extraction"));
static CONTROL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("input, select, textarea", "form control extraction")
});

/// Input types that are labelled by their own value or need no label.
const SELF_LABELLED_INPUTS: &[&str] = &["hidden", "submit", "button", "reset", "image"];

pub(super) fn extract_controls(document: &Html) -> Vec<FormControl> {
    let labelled_ids: HashSet<&str> = document
        .select(&LABEL_FOR_SELECTOR)
        .filter_map(|label| attr(&label, "for"))
        .filter(|id| !id.is_empty())
        .collect();

    document
        .select(&CONTROL_SELECTOR)
        .filter_map(|element| {
            let tag = element.value().name();
            let input_type = (tag == "input")
                .then(|| attr(&element, "type").unwrap_or("text").to_ascii_lowercase());
            if input_type
                .as_deref()
                .is_some_and(|t| SELF_LABELLED_INPUTS.contains(&t))
            {
                return None;
            }

            let id = attr(&element, "id").filter(|id| !id.is_empty());
            let non_empty = |name: &str| attr(&element, name).is_some_and(|v| !v.is_empty());
            let has_label = id.is_some_and(|id| labelled_ids.contains(id))
                || is_inside(&element, "label")
                || non_empty("aria-label")
                || non_empty("aria-labelledby")
                || non_empty("title");

            Some(FormControl {
                tag: tag.to_string(),
                input_type,
                id: id.map(str::to_string),
                has_label,
                has_placeholder: non_empty("placeholder"),
            })
        })
        .collect()
}
