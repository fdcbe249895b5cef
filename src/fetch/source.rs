//! The page-source seam and per-session fetch sharing.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use tokio::sync::OnceCell;

use super::FetchResult;
use crate::error_handling::FetchError;
use crate::target::AnalysisTarget;

/// Anything that can produce a `FetchResult` for a target.
///
/// `Fetcher` is the network implementation. Tests and callers with captured
/// pages can provide their own.
pub trait PageSource: Send + Sync + 'static {
    /// Fetches the page behind `target`.
    fn fetch(
        &self,
        target: &AnalysisTarget,
    ) -> impl Future<Output = Result<Arc<FetchResult>, FetchError>> + Send;
}

/// Memoizes the first fetch so every category of a session sees the same page.
///
/// Concurrent callers wait on the same in-flight request; only one outbound
/// request is made. Failures are memoized too.
pub struct SharedFetch<S> {
    inner: S,
    cell: OnceCell<Result<Arc<FetchResult>, FetchError>>,
}

impl<S> SharedFetch<S> {
    /// Wraps a source.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cell: OnceCell::new(),
        }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Whether the fetch already completed.
    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }
}

impl<S: PageSource> PageSource for SharedFetch<S> {
    async fn fetch(&self, target: &AnalysisTarget) -> Result<Arc<FetchResult>, FetchError> {
        if self.cell.initialized() {
            debug!("Reusing fetched page for {target}");
        }
        self.cell
            .get_or_init(|| self.inner.fetch(target))
            .await
            .clone()
    }
}

/// Serves one pre-captured page (or error) for every target.
///
/// Used to analyze HTML that was obtained elsewhere.
#[derive(Debug, Clone)]
pub struct StaticPage {
    outcome: Result<Arc<FetchResult>, FetchError>,
}

impl StaticPage {
    /// Serves `page`.
    pub fn new(page: FetchResult) -> Self {
        Self {
            outcome: Ok(Arc::new(page)),
        }
    }

    /// Fails every fetch with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl PageSource for StaticPage {
    async fn fetch(&self, _target: &AnalysisTarget) -> Result<Arc<FetchResult>, FetchError> {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FetchErrorKind;
    use reqwest::header::HeaderMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl PageSource for CountingSource {
        async fn fetch(&self, target: &AnalysisTarget) -> Result<Arc<FetchResult>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(Arc::new(FetchResult::from_parts(
                target.url().clone(),
                200,
                HeaderMap::new(),
                "<html></html>",
                Duration::from_millis(20),
            )))
        }
    }

    #[tokio::test]
    async fn test_shared_fetch_calls_source_once() {
        let shared = Arc::new(SharedFetch::new(CountingSource {
            calls: AtomicUsize::new(0),
        }));
        let target = AnalysisTarget::parse("example.com").unwrap();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let shared = Arc::clone(&shared);
            let target = target.clone();
            handles.push(tokio::spawn(async move { shared.fetch(&target).await }));
        }
        let mut pages = Vec::new();
        for handle in handles {
            pages.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(shared.inner().calls.load(Ordering::SeqCst), 1);
        assert!(shared.is_resolved());
        assert!(pages.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_shared_fetch_memoizes_errors() {
        let shared = SharedFetch::new(StaticPage::failing(FetchError::new(
            FetchErrorKind::Dns,
            "no such host",
        )));
        let target = AnalysisTarget::parse("example.com").unwrap();
        let first = shared.fetch(&target).await.unwrap_err();
        let second = shared.fetch(&target).await.unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.kind, FetchErrorKind::Dns);
    }

    #[tokio::test]
    async fn test_static_page_serves_same_page() {
        let target = AnalysisTarget::parse("example.com").unwrap();
        let page = FetchResult::from_parts(
            target.url().clone(),
            200,
            HeaderMap::new(),
            "<title>x</title>",
            Duration::ZERO,
        );
        let source = StaticPage::new(page);
        let result = source.fetch(&target).await.unwrap();
        assert_eq!(result.body, "<title>x</title>");
    }
}
