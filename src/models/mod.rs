//! Analysis data model.
//!
//! These types are the stable contract between the analyzers and whatever
//! renders their output: a fixed set of categories, checklist items with
//! stable keys, and one `CategoryResult` per analyzer run.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::CategoryError;

/// One of the five fixed audit dimensions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, ValueEnum, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Load time, payload size, request count, compression
    Performance,
    /// Search engine optimisation
    Seo,
    /// Transport and header hardening
    Security,
    /// Markup accessibility
    Accessibility,
    /// Mobile readiness
    Mobile,
}

impl Category {
    /// All categories in presentation order.
    pub const ALL: [Category; 5] = [
        Category::Performance,
        Category::Seo,
        Category::Security,
        Category::Accessibility,
        Category::Mobile,
    ];

    /// Stable lowercase tag used in events and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::Seo => "seo",
            Category::Security => "security",
            Category::Accessibility => "accessibility",
            Category::Mobile => "mobile",
        }
    }

    /// Human-readable name for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Performance => "Performance",
            Category::Seo => "SEO",
            Category::Security => "Security",
            Category::Accessibility => "Accessibility",
            Category::Mobile => "Mobile",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Performance => 0,
            Category::Seo => 1,
            Category::Security => 2,
            Category::Accessibility => 3,
            Category::Mobile => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single checklist rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The check passed
    Pass,
    /// The check failed; the full rule weight is deducted
    Fail,
    /// Partially satisfied; half the rule weight is deducted
    Warning,
    /// The rule could not be evaluated; excluded from scoring
    Unknown,
}

impl ItemStatus {
    /// Returns a human-readable string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pass => "pass",
            ItemStatus::Fail => "fail",
            ItemStatus::Warning => "warning",
            ItemStatus::Unknown => "unknown",
        }
    }
}

/// One checklist finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisItem {
    /// Stable rule identifier (e.g. `meta_description`)
    pub key: &'static str,
    /// Short human-readable label
    pub label: &'static str,
    /// Rule outcome
    pub status: ItemStatus,
    /// Explanation or remediation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Output of one analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    /// Category this result belongs to
    pub category: Category,
    /// Score in `[0, 100]`
    pub score: u8,
    /// Version of the rule table that produced `items`
    pub checklist_version: u32,
    /// Findings in rule-table order
    pub items: Vec<AnalysisItem>,
}

impl CategoryResult {
    /// Looks up an item by its rule key.
    pub fn item(&self, key: &str) -> Option<&AnalysisItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Keys of every item with the given status, in rule order.
    pub fn keys_with_status(&self, status: ItemStatus) -> Vec<&'static str> {
        self.items
            .iter()
            .filter(|item| item.status == status)
            .map(|item| item.key)
            .collect()
    }

    /// Keys of every failed item, in rule order.
    pub fn failed_keys(&self) -> Vec<&'static str> {
        self.keys_with_status(ItemStatus::Fail)
    }
}

/// A category either resolves with a result or is unavailable.
pub type CategoryOutcome = Result<CategoryResult, CategoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_category_index_matches_all_order() {
        for (position, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), position);
        }
        assert_eq!(Category::iter().count(), Category::ALL.len());
    }

    #[test]
    fn test_category_tags_are_lowercase() {
        for category in Category::iter() {
            assert_eq!(category.as_str(), category.as_str().to_lowercase());
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_category_serializes_as_tag() {
        let json = serde_json::to_string(&Category::Seo).unwrap();
        assert_eq!(json, "\"seo\"");
    }

    #[test]
    fn test_category_result_lookup() {
        let result = CategoryResult {
            category: Category::Security,
            score: 70,
            checklist_version: 1,
            items: vec![
                AnalysisItem {
                    key: "https",
                    label: "HTTPS",
                    status: ItemStatus::Pass,
                    detail: None,
                },
                AnalysisItem {
                    key: "hsts",
                    label: "HSTS",
                    status: ItemStatus::Fail,
                    detail: Some("missing".to_string()),
                },
            ],
        };
        assert_eq!(result.item("hsts").map(|i| i.status), Some(ItemStatus::Fail));
        assert!(result.item("csp").is_none());
        assert_eq!(result.failed_keys(), vec!["hsts"]);
    }

    #[test]
    fn test_item_detail_omitted_when_absent() {
        let item = AnalysisItem {
            key: "lang",
            label: "Language",
            status: ItemStatus::Pass,
            detail: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("detail"));
        assert!(json.contains("\"status\":\"pass\""));
    }
}
