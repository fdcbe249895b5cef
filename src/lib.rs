//! site_check library: single-page web audits
//!
//! This library fetches one page and scores it across five categories
//! (performance, SEO, security, accessibility and mobile readiness). Each
//! category is analyzed in its own task; the results are combined into a
//! composite score with a qualitative label.
//!
//! # Example
//!
//! ```no_run
//! use site_check::{analyze_url, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let report = analyze_url("example.com", &Config::default()).await?;
//! println!(
//!     "{}: {}/100 ({})",
//!     report.target, report.composite.overall_score, report.composite.label
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level pieces are public too: build an [`AnalysisSession`] over any
//! [`PageSource`] to subscribe to [`ScoreEvent`]s, cancel a run, or analyze a
//! page captured elsewhere with [`StaticPage`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod aggregate;
pub mod analyzers;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod parse;
pub mod report;
pub mod session;
pub mod target;
mod utils;

use anyhow::{Context, Result};

// Re-export public API
pub use aggregate::{AggregateScore, CompositeView, Overall, ScoreLabel};
pub use config::{Config, LogFormat, LogLevel, OutputFormat, Thresholds};
pub use error_handling::{CategoryError, FetchError, FetchErrorKind, TargetError};
pub use fetch::{FetchResult, Fetcher, PageSource, SharedFetch, StaticPage};
pub use models::{AnalysisItem, Category, CategoryResult, ItemStatus};
pub use report::{print_report, CategoryReport, PageSummary, SessionReport};
pub use session::{AnalysisSession, ScoreEvent};
pub use target::AnalysisTarget;

/// Validates `input`, fetches it once and runs every configured category.
///
/// # Errors
///
/// Fails before any request is made when the configuration is invalid, the
/// target is rejected (a [`TargetError`] in the chain) or the HTTP client
/// cannot be built. Fetch and analysis failures do not fail the call; they
/// show up as unavailable categories in the report.
pub async fn analyze_url(input: &str, config: &Config) -> Result<SessionReport> {
    config.validate().context("Invalid configuration")?;
    let target = AnalysisTarget::parse(input)?;
    let fetcher = Fetcher::from_config(config).context("Failed to initialize HTTP client")?;

    let session = AnalysisSession::new(target, SharedFetch::new(fetcher))
        .with_categories(&config.categories)
        .with_thresholds(config.thresholds.clone());
    Ok(session.run().await)
}
