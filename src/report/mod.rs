//! Session reports and their rendering.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;

use crate::aggregate::{CompositeView, ScoreLabel};
use crate::config::OutputFormat;
use crate::fetch::FetchResult;
use crate::models::{AnalysisItem, Category, CategoryOutcome, ItemStatus};
use crate::utils::preview;

/// What was fetched, once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Time to the fully read body
    pub load_time_ms: u64,
    /// Bytes on the wire
    pub transfer_size: usize,
    /// Bytes after content decoding
    pub decoded_size: usize,
    /// Body hit the size cap
    pub truncated: bool,
}

impl PageSummary {
    pub(crate) fn from_fetch(fetch: &FetchResult) -> Self {
        Self {
            final_url: fetch.final_url.to_string(),
            status: fetch.status,
            load_time_ms: u64::try_from(fetch.elapsed.as_millis()).unwrap_or(u64::MAX),
            transfer_size: fetch.transfer_size,
            decoded_size: fetch.decoded_size,
            truncated: fetch.truncated,
        }
    }
}

/// One category card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    /// Category
    pub category: Category,
    /// Score, `None` when unavailable
    pub score: Option<u8>,
    /// Band for `score`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<ScoreLabel>,
    /// Rule table version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_version: Option<u32>,
    /// Checklist findings
    pub items: Vec<AnalysisItem>,
    /// Why the category is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryReport {
    /// Builds the card for a resolved or failed category.
    pub fn from_outcome(category: Category, outcome: CategoryOutcome) -> Self {
        match outcome {
            Ok(result) => Self {
                category,
                score: Some(result.score),
                label: Some(ScoreLabel::for_score(result.score)),
                checklist_version: Some(result.checklist_version),
                items: result.items,
                error: None,
            },
            Err(e) => Self {
                category,
                score: None,
                label: None,
                checklist_version: None,
                items: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Whether the category produced a score.
    pub fn is_available(&self) -> bool {
        self.score.is_some()
    }
}

/// Everything one session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    /// Normalized target URL
    pub target: String,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the session
    pub elapsed_ms: u64,
    /// Fetched page, when any category got it
    pub page: Option<PageSummary>,
    /// Cards in presentation order
    pub categories: Vec<CategoryReport>,
    /// Composite score
    pub composite: CompositeView,
}

impl SessionReport {
    /// Card for `category`, if it was requested.
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Categories that could not be scored.
    pub fn unavailable(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| !c.is_available())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable cards.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", "Site check:".bold(), self.target);
        if let Some(page) = &self.page {
            let _ = writeln!(
                out,
                "  HTTP {} · {} ms · {:.1} KB{}",
                page.status,
                page.load_time_ms,
                page.transfer_size as f64 / 1024.0,
                if page.final_url != self.target {
                    format!(" · {}", page.final_url)
                } else {
                    String::new()
                }
            );
        }
        let _ = writeln!(
            out,
            "\n{} {}/100 {}\n",
            "Overall".bold(),
            self.composite.overall_score,
            paint_label(self.composite.label)
        );

        for card in &self.categories {
            match card.score {
                Some(score) => {
                    let _ = writeln!(
                        out,
                        "{:<14} {:>3}/100 {}",
                        card.category.display_name().bold(),
                        score,
                        paint_label(ScoreLabel::for_score(score))
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{:<14} {} ({})",
                        card.category.display_name().bold(),
                        "unavailable".red(),
                        card.error.as_deref().unwrap_or_default()
                    );
                }
            }
            for item in &card.items {
                let detail = item
                    .detail
                    .as_deref()
                    .map(|d| format!(": {}", preview(d)))
                    .unwrap_or_default();
                let _ = writeln!(out, "  {} {}{}", status_mark(item.status), item.label, detail);
            }
            out.push('\n');
        }
        out
    }
}

fn status_mark(status: ItemStatus) -> ColoredString {
    match status {
        ItemStatus::Pass => "✔".green(),
        ItemStatus::Fail => "✘".red(),
        ItemStatus::Warning => "⚠".yellow(),
        ItemStatus::Unknown => "?".dimmed(),
    }
}

fn paint_label(label: ScoreLabel) -> ColoredString {
    match label {
        ScoreLabel::Excellent => label.as_str().green().bold(),
        ScoreLabel::Bon => label.as_str().cyan().bold(),
        ScoreLabel::AAmeliorer => label.as_str().yellow().bold(),
        ScoreLabel::Critique => label.as_str().red().bold(),
    }
}

/// Writes `report` to stdout in the requested format.
///
/// # Errors
///
/// Returns the serialization error for JSON output.
pub fn print_report(report: &SessionReport, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Plain => print!("{}", report.render_plain()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
