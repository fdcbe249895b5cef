//! Category analyzers.
//!
//! Each analyzer is a fixed, versioned table of rules. A rule reads the page
//! context and returns a `Check`; `evaluate` turns the table into a
//! `CategoryResult`:
//! - Start at 100
//! - `fail` subtracts the rule weight, `warning` subtracts half of it (integer division)
//! - A rule that returns `RuleEvaluationError` becomes an `unknown` item and
//!   is not weighted
//! - The score never drops below 0

mod accessibility;
mod mobile;
mod performance;
mod security;
mod seo;

use log::{debug, warn};

use crate::config::Thresholds;
use crate::error_handling::RuleEvaluationError;
use crate::fetch::FetchResult;
use crate::models::{AnalysisItem, Category, CategoryResult, ItemStatus};
use crate::parse::ParsedDocument;
use crate::target::AnalysisTarget;

pub use accessibility::AccessibilityAnalyzer;
pub use mobile::MobileAnalyzer;
pub use performance::PerformanceAnalyzer;
pub use security::SecurityAnalyzer;
pub use seo::SeoAnalyzer;

/// Read-only inputs shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Validated target
    pub target: &'a AnalysisTarget,
    /// Captured response
    pub fetch: &'a FetchResult,
    /// Parsed body
    pub document: &'a ParsedDocument,
    /// Scoring thresholds
    pub thresholds: &'a Thresholds,
}

/// Outcome of one rule, before weighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// Pass, fail or warning
    pub status: ItemStatus,
    /// Explanation shown next to the item
    pub detail: Option<String>,
}

impl Check {
    /// A passing check with no detail.
    pub fn pass() -> Self {
        Self {
            status: ItemStatus::Pass,
            detail: None,
        }
    }

    /// A passing check with an informative detail.
    pub fn pass_with(detail: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Pass,
            detail: Some(detail.into()),
        }
    }

    /// A partially satisfied check.
    pub fn warn(detail: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Warning,
            detail: Some(detail.into()),
        }
    }

    /// A failed check.
    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Fail,
            detail: Some(detail.into()),
        }
    }
}

/// Result of evaluating one rule.
pub type RuleResult = Result<Check, RuleEvaluationError>;

/// One checklist entry.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable snake_case key
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Points at stake
    pub weight: u8,
    /// The check itself
    pub check: fn(&PageContext<'_>) -> RuleResult,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("key", &self.key)
            .field("weight", &self.weight)
            .finish()
    }
}

/// A category's rule table.
pub trait Analyzer: Send + Sync {
    /// Category this analyzer scores.
    fn category(&self) -> Category;

    /// Version of the rule table; bumped whenever keys or weights change.
    fn checklist_version(&self) -> u32 {
        1
    }

    /// Rules in presentation order.
    fn rules(&self) -> &'static [Rule];

    /// Runs every rule against `ctx`.
    fn analyze(&self, ctx: &PageContext<'_>) -> CategoryResult {
        evaluate(self.category(), self.checklist_version(), self.rules(), ctx)
    }
}

/// The analyzer for `category`.
pub fn analyzer_for(category: Category) -> &'static dyn Analyzer {
    match category {
        Category::Performance => &PerformanceAnalyzer,
        Category::Seo => &SeoAnalyzer,
        Category::Security => &SecurityAnalyzer,
        Category::Accessibility => &AccessibilityAnalyzer,
        Category::Mobile => &MobileAnalyzer,
    }
}

/// Scores `category` for the given page.
pub fn analyze(category: Category, ctx: &PageContext<'_>) -> CategoryResult {
    analyzer_for(category).analyze(ctx)
}

/// Applies the scoring policy to a rule table.
pub fn evaluate(
    category: Category,
    checklist_version: u32,
    rules: &[Rule],
    ctx: &PageContext<'_>,
) -> CategoryResult {
    let mut penalty: u32 = 0;
    let items = rules
        .iter()
        .map(|rule| match (rule.check)(ctx) {
            Ok(check) => {
                penalty += match check.status {
                    ItemStatus::Fail => u32::from(rule.weight),
                    ItemStatus::Warning => u32::from(rule.weight / 2),
                    ItemStatus::Pass | ItemStatus::Unknown => 0,
                };
                AnalysisItem {
                    key: rule.key,
                    label: rule.label,
                    status: check.status,
                    detail: check.detail,
                }
            }
            Err(e) => {
                warn!(
                    "Rule {}.{} could not be evaluated for {}: {e}",
                    category, rule.key, ctx.target
                );
                AnalysisItem {
                    key: rule.key,
                    label: rule.label,
                    status: ItemStatus::Unknown,
                    detail: Some(e.to_string()),
                }
            }
        })
        .collect();

    let score = u8::try_from(100u32.saturating_sub(penalty)).unwrap_or(0);
    debug!("{category} scored {score} for {}", ctx.target);
    CategoryResult {
        category,
        score,
        checklist_version,
        items,
    }
}

/// `numerator / denominator` as a whole percentage.
pub(crate) fn percent(numerator: usize, denominator: usize) -> usize {
    if denominator == 0 {
        100
    } else {
        numerator * 100 / denominator
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use reqwest::header::HeaderMap;
    use std::time::Duration;

    /// A page fixture: target, response and parsed body.
    pub(crate) struct Fixture {
        pub(crate) target: AnalysisTarget,
        pub(crate) fetch: FetchResult,
        pub(crate) document: ParsedDocument,
        pub(crate) thresholds: Thresholds,
    }

    impl Fixture {
        pub(crate) fn new(url: &str, html: &str) -> Self {
            let target = AnalysisTarget::parse(url).unwrap();
            let fetch = FetchResult::from_parts(
                target.url().clone(),
                200,
                HeaderMap::new(),
                html,
                Duration::from_millis(300),
            );
            let document = ParsedDocument::parse(html, target.url());
            Self {
                target,
                fetch,
                document,
                thresholds: Thresholds::default(),
            }
        }

        pub(crate) fn header(mut self, name: &str, value: &str) -> Self {
            self.fetch = self.fetch.with_header(name, value);
            self
        }

        pub(crate) fn with_fetch(mut self, update: impl FnOnce(&mut FetchResult)) -> Self {
            update(&mut self.fetch);
            let base = self.fetch.final_url.clone();
            self.document = ParsedDocument::parse(&self.fetch.body, &base);
            self
        }

        pub(crate) fn ctx(&self) -> PageContext<'_> {
            PageContext {
                target: &self.target,
                fetch: &self.fetch,
                document: &self.document,
                thresholds: &self.thresholds,
            }
        }

        pub(crate) fn run(&self, category: Category) -> CategoryResult {
            analyze(category, &self.ctx())
        }
    }

    pub(crate) fn status_of(result: &CategoryResult, key: &str) -> ItemStatus {
        result
            .item(key)
            .map(|item| item.status)
            .unwrap_or_else(|| panic!("no item {key} in {}", result.category))
    }
}
