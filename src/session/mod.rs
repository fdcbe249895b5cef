//! Analysis session: one target, one fetch, one task per category.
//!
//! Every requested category runs in its own tokio task. Categories share the
//! page through the session's `PageSource` (a `SharedFetch` in production, so
//! the network is hit once) and resolve in whatever order they finish. Each
//! resolution updates the aggregate and is broadcast as a `ScoreEvent`.
//!
//! Failures stay inside their category: a fetch error, a panic or
//! cancellation makes that category unavailable and leaves the others alone.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::aggregate::AggregateScore;
use crate::analyzers::{self, PageContext};
use crate::config::Thresholds;
use crate::error_handling::CategoryError;
use crate::fetch::{FetchResult, PageSource};
use crate::models::{Category, CategoryOutcome, CategoryResult};
use crate::parse::ParsedDocument;
use crate::report::{CategoryReport, PageSummary, SessionReport};
use crate::target::AnalysisTarget;

/// Capacity of the score event channel; one event per category fits twice over.
const EVENT_CHANNEL_CAPACITY: usize = Category::ALL.len() * 2;

/// Emitted each time a category resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreEvent {
    /// Category that resolved
    pub category: Category,
    /// Its score, `None` when the category is unavailable
    pub score: Option<u8>,
}

/// Result of one category task.
type TaskOutput = Result<(CategoryResult, Arc<FetchResult>), CategoryError>;

/// A single analysis run.
pub struct AnalysisSession<S: PageSource> {
    target: AnalysisTarget,
    source: Arc<S>,
    categories: Vec<Category>,
    thresholds: Arc<Thresholds>,
    aggregate: Arc<AggregateScore>,
    events: broadcast::Sender<ScoreEvent>,
    cancel: CancellationToken,
}

impl<S: PageSource> AnalysisSession<S> {
    /// A session over every category with default thresholds.
    pub fn new(target: AnalysisTarget, source: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            target,
            source: Arc::new(source),
            categories: Category::ALL.to_vec(),
            thresholds: Arc::new(Thresholds::default()),
            aggregate: Arc::new(AggregateScore::new()),
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Restricts the session to `categories` (deduplicated, presentation order).
    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.categories = Category::ALL
            .iter()
            .copied()
            .filter(|category| categories.contains(category))
            .collect();
        self
    }

    /// Overrides the scoring thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Arc::new(thresholds);
        self
    }

    /// The target being analyzed.
    pub fn target(&self) -> &AnalysisTarget {
        &self.target
    }

    /// Receives a `ScoreEvent` per category resolution. Subscribe before `run`.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.events.subscribe()
    }

    /// Live aggregate; readable while the session runs.
    pub fn aggregate(&self) -> Arc<AggregateScore> {
        Arc::clone(&self.aggregate)
    }

    /// Token that cancels every unresolved category.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs every category to resolution and reports.
    pub async fn run(self) -> SessionReport {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(
            "Analyzing {} ({} categories)",
            self.target,
            self.categories.len()
        );

        let mut tasks = FuturesUnordered::new();
        for &category in &self.categories {
            let source = Arc::clone(&self.source);
            let target = self.target.clone();
            let thresholds = Arc::clone(&self.thresholds);
            let cancel = self.cancel.clone();
            let handle = tokio::spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(CategoryError::Cancelled),
                    output = run_category(category, source.as_ref(), &target, &thresholds) => output,
                }
            });
            tasks.push(async move { (category, handle.await) });
        }

        let mut outcomes: BTreeMap<Category, CategoryOutcome> = BTreeMap::new();
        let mut page = None;
        while let Some((category, joined)) = tasks.next().await {
            let outcome = match joined.unwrap_or_else(|e| Err(join_failure(category, e))) {
                Ok((result, fetch)) => {
                    if page.is_none() {
                        page = Some(PageSummary::from_fetch(&fetch));
                    }
                    Ok(result)
                }
                Err(e) => Err(e),
            };
            self.resolve(category, &outcome);
            outcomes.insert(category, outcome);
        }

        let composite = self.aggregate.snapshot();
        let elapsed = start.elapsed();
        info!(
            "Finished {} in {:.2}s: {} ({})",
            self.target,
            elapsed.as_secs_f64(),
            composite.overall_score,
            composite.label
        );

        SessionReport {
            target: self.target.as_str().to_string(),
            started_at,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            page,
            categories: outcomes
                .into_iter()
                .map(|(category, outcome)| CategoryReport::from_outcome(category, outcome))
                .collect(),
            composite,
        }
    }

    fn resolve(&self, category: Category, outcome: &CategoryOutcome) {
        let score = match outcome {
            Ok(result) => {
                self.aggregate.update(category, result.score);
                debug!("{category} resolved with {}", result.score);
                Some(result.score)
            }
            Err(e) => {
                warn!("{category} unavailable for {}: {e}", self.target);
                None
            }
        };
        // no subscribers is fine
        let _ = self.events.send(ScoreEvent { category, score });
    }
}

/// Maps a join failure to the category error it stands for.
fn join_failure(category: Category, error: JoinError) -> CategoryError {
    if error.is_panic() {
        let payload = error.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("{category} task panicked: {message}");
        CategoryError::Internal(message)
    } else {
        CategoryError::Cancelled
    }
}

/// Fetch, parse and score one category.
pub(crate) async fn run_category<S: PageSource>(
    category: Category,
    source: &S,
    target: &AnalysisTarget,
    thresholds: &Thresholds,
) -> TaskOutput {
    let fetch = source.fetch(target).await?;
    let document = ParsedDocument::parse(&fetch.body, &fetch.final_url);
    let ctx = PageContext {
        target,
        fetch: &fetch,
        document: &document,
        thresholds,
    };
    let result = analyzers::analyze(category, &ctx);
    Ok((result, fetch))
}
