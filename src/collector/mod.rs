//! Frontier-driven traversal over a [`Fetcher`].
//!
//! Fetch tasks run concurrently (bounded by a semaphore). Each finished task
//! may hand back follow-up tasks; the run is over when no task is queued or
//! in flight. Failures end only the branch they occur in.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::app::Result;
use crate::domain::Document;
use crate::extractor::{ContentExtractor, Extraction};
use crate::fetcher::{FetchResponse, Fetcher};
use crate::store::{DedupStore, DocumentHandle};
use crate::strategy::{FetchRole, FetchTask, TraversalStrategy};

pub const DEFAULT_WORKERS: usize = 10;

/// State shared by the fetch tasks of one run.
struct Engine {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    strategy: Option<Arc<dyn TraversalStrategy>>,
    extractor: ContentExtractor,
    store: Arc<DedupStore>,
}

pub struct Collector {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    strategy: Option<Arc<dyn TraversalStrategy>>,
    extractor: ContentExtractor,
    store: Arc<DedupStore>,
    semaphore: Arc<Semaphore>,
    visited: Mutex<HashSet<String>>,
}

impl Collector {
    /// A collector that discovers documents with `strategy`.
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        strategy: Arc<dyn TraversalStrategy>,
    ) -> Self {
        Self::build(fetcher, Some(strategy))
    }

    /// A collector without discovery; only [`Collector::collect`] does anything.
    pub fn generic(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::build(fetcher, None)
    }

    fn build(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        strategy: Option<Arc<dyn TraversalStrategy>>,
    ) -> Self {
        Self {
            fetcher,
            strategy,
            extractor: ContentExtractor::default(),
            store: Arc::new(DedupStore::new()),
            semaphore: Arc::new(Semaphore::new(DEFAULT_WORKERS)),
            visited: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(workers.max(1)));
        self
    }

    /// Applies to every run started after this call.
    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Run the configured traversal from its seed and return every document.
    pub async fn collect_site(&self) -> Vec<Document> {
        let Some(strategy) = self.strategy.clone() else {
            debug!("No traversal strategy configured");
            return self.list_all();
        };

        let seed = strategy.seed();
        info!(source = strategy.name(), seed = %seed.url, "Collecting site");
        self.run(vec![seed]).await;

        let documents = self.list_all();
        info!(
            source = strategy.name(),
            documents = documents.len(),
            "Collection finished"
        );
        documents
    }

    /// Fetch and extract a single page, without site-specific discovery.
    pub async fn collect(&self, url: &str) -> Document {
        if let Some(existing) = self.store.get(url) {
            return existing.snapshot();
        }

        let handle = self.store.get_or_create(url);
        self.run(vec![FetchTask::page(url)]).await;
        handle.snapshot()
    }

    pub fn exists(&self, url: &str) -> bool {
        self.store.exists(url)
    }

    pub fn get(&self, url: &str) -> Option<Document> {
        self.store.get(url).map(|h| h.snapshot())
    }

    pub fn list_all(&self) -> Vec<Document> {
        self.store.list_all()
    }

    pub fn store(&self) -> &Arc<DedupStore> {
        &self.store
    }

    async fn run(&self, seeds: Vec<FetchTask>) {
        let engine = Arc::new(Engine {
            fetcher: self.fetcher.clone(),
            strategy: self.strategy.clone(),
            extractor: self.extractor.clone(),
            store: self.store.clone(),
        });

        let mut frontier = JoinSet::new();
        for task in seeds {
            self.enqueue(&mut frontier, &engine, task);
        }

        while let Some(joined) = frontier.join_next().await {
            match joined {
                Ok(follow_ups) => {
                    for task in follow_ups {
                        self.enqueue(&mut frontier, &engine, task);
                    }
                }
                Err(e) => {
                    error!("Task join error: {}", e);
                }
            }
        }
    }

    /// Spawn `task` unless its URL was already requested by this collector.
    fn enqueue(
        &self,
        frontier: &mut JoinSet<Vec<FetchTask>>,
        engine: &Arc<Engine>,
        task: FetchTask,
    ) {
        let first_visit = self
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task.url.clone());
        if !first_visit {
            debug!(url = %task.url, "Already requested");
            return;
        }

        let engine = engine.clone();
        let semaphore = self.semaphore.clone();
        frontier.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Vec::new();
            };
            engine.process(task).await
        });
    }
}

impl Engine {
    async fn process(&self, task: FetchTask) -> Vec<FetchTask> {
        let response = match self.fetcher.fetch(&task.url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %task.url, error = %e, "Fetch failed");
                return Vec::new();
            }
        };

        match self.handle(&task, &response) {
            Ok(next) => next,
            Err(e) if e.is_decode_error() => {
                warn!(url = %task.url, error = %e, "Discarding undecodable response");
                Vec::new()
            }
            Err(e) => {
                debug!(url = %task.url, error = %e, "Response left document unchanged");
                Vec::new()
            }
        }
    }

    fn handle(&self, task: &FetchTask, response: &FetchResponse) -> Result<Vec<FetchTask>> {
        let store = self.store.as_ref();

        match (task.role, self.strategy.as_deref()) {
            (FetchRole::Index, Some(strategy)) => strategy.on_index_response(response, store),
            (FetchRole::Leaf, Some(strategy)) => strategy.on_leaf_response(response, store),
            (FetchRole::Detail, Some(strategy)) => strategy.on_detail_response(response, store),
            (FetchRole::Body, strategy) => {
                // Keyed by the response's own URL; a redirect means a miss.
                let Some(handle) = store.get(&response.url) else {
                    debug!(url = %response.url, "No document for body response");
                    return Ok(Vec::new());
                };
                let extraction = self.extract(response)?;
                handle.update(|doc| match strategy {
                    Some(strategy) => strategy.apply_extraction(doc, extraction),
                    None => doc.body = extraction.body,
                });
                Ok(Vec::new())
            }
            (FetchRole::Page, _) => {
                let Some(handle) = store.get(&task.url) else {
                    debug!(url = %task.url, "No document for page response");
                    return Ok(Vec::new());
                };
                let extraction = self.extract(response)?;
                merge_page(&handle, extraction);
                Ok(Vec::new())
            }
            (role, None) => {
                debug!(url = %task.url, ?role, "Discovery response without a strategy");
                Ok(Vec::new())
            }
        }
    }

    fn extract(&self, response: &FetchResponse) -> Result<Extraction> {
        self.extractor.extract(&response.text(), &response.url)
    }
}

/// Single-page mode trusts the page for everything it carries.
fn merge_page(handle: &DocumentHandle, extraction: Extraction) {
    handle.update(|doc| {
        if !extraction.title.is_empty() {
            doc.title = extraction.title;
        }
        doc.body = extraction.body;
        if let Some(published) = extraction.published {
            doc.publish_date = published.timestamp();
        }
        if doc.source.is_empty() {
            if let Some(site) = extraction.site {
                doc.source = site;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::app::GleanerError;
    use crate::domain::DateWindow;
    use crate::strategy::FeedStrategy;

    const PARAGRAPH: &str = "This paragraph is long enough to count as real article content, with commas, clauses, and detail.";

    /// Serves canned bodies and counts every request.
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, (String, String)>,
        calls: AtomicUsize,
    }

    impl MapFetcher {
        fn page(mut self, url: &str, body: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), (url.to_string(), body.into()));
            self
        }

        fn redirect(mut self, url: &str, to: &str, body: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), (to.to_string(), body.into()));
            self
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(url) {
                Some((final_url, body)) => Ok(FetchResponse::new(final_url.as_str(), body.as_str())),
                None => Err(GleanerError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn article(title: &str) -> String {
        format!(
            "<html><head><title>{title}</title><meta property=\"article:published_time\" content=\"2024-03-01T10:00:00Z\"></head>\
             <body><article><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></article></body></html>"
        )
    }

    fn feed(link: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>F</title><item><title>From feed</title><link>{link}</link><pubDate>{}</pubDate></item></channel></rss>"#,
            chrono::Utc::now().to_rfc2822()
        )
    }

    #[tokio::test]
    async fn test_collect_single_page() {
        let fetcher = Arc::new(MapFetcher::default().page("https://blog.example.com/post", article("Hello")));
        let collector = Collector::generic(fetcher);

        let doc = collector.collect("https://blog.example.com/post").await;

        assert_eq!(doc.url, "https://blog.example.com/post");
        assert_eq!(doc.title, "Hello");
        assert!(doc.body.contains("long enough"));
        assert_eq!(doc.publish_date, 1709287200);
        assert_eq!(doc.source, "blog.example.com");
        assert!(collector.exists("https://blog.example.com/post"));
    }

    #[tokio::test]
    async fn test_collect_known_url_does_not_refetch() {
        let fetcher = Arc::new(MapFetcher::default().page("https://blog.example.com/post", article("Hello")));
        let collector = Collector::generic(fetcher.clone());

        let first = collector.collect("https://blog.example.com/post").await;
        let second = collector.collect("https://blog.example.com/post").await;

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_page_leaves_empty_document() {
        let collector = Collector::generic(Arc::new(MapFetcher::default()));

        let doc = collector.collect("https://gone.example.com/").await;

        assert_eq!(doc.url, "https://gone.example.com/");
        assert!(doc.title.is_empty());
        assert!(doc.body.is_empty());
    }

    #[tokio::test]
    async fn test_generic_collect_site_is_empty() {
        let collector = Collector::generic(Arc::new(MapFetcher::default()));
        assert!(collector.collect_site().await.is_empty());
    }

    #[tokio::test]
    async fn test_redirected_body_is_a_lookup_miss() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("https://feed.example.com/rss", feed("https://x/a"))
                .redirect("https://x/a", "https://x/a?utm=1", article("Moved")),
        );
        let strategy = Arc::new(FeedStrategy::new("https://feed.example.com/rss", "X", DateWindow::new(2)));
        let collector = Collector::new(fetcher, strategy);

        let docs = collector.collect_site().await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://x/a");
        assert_eq!(docs[0].title, "From feed");
        assert!(docs[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_unextractable_body_keeps_feed_metadata() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("https://feed.example.com/rss", feed("https://x/a"))
                .page("https://x/a", "<html><body><p>short</p></body></html>"),
        );
        let strategy = Arc::new(FeedStrategy::new("https://feed.example.com/rss", "X", DateWindow::new(2)));
        let collector = Collector::new(fetcher, strategy).with_workers(1);

        let docs = collector.collect_site().await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "From feed");
        assert!(docs[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_extractor_replaced_after_a_run() {
        let short = "<html><body><article><p>A short but real note.</p></article></body></html>";
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("https://x/first", short)
                .page("https://x/second", short),
        );
        let collector = Collector::generic(fetcher);
        assert!(collector.collect("https://x/first").await.body.is_empty());

        let collector =
            collector.with_extractor(ContentExtractor::new(crate::extractor::ExtractorConfig::lenient()));
        let doc = collector.collect("https://x/second").await;
        assert_eq!(doc.body, "A short but real note.");
    }

    #[tokio::test]
    async fn test_lenient_extractor_is_used() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("https://x/short", "<html><body><article><p>A short but real note.</p></article></body></html>"),
        );
        let collector = Collector::generic(fetcher)
            .with_extractor(ContentExtractor::new(crate::extractor::ExtractorConfig::lenient()));

        let doc = collector.collect("https://x/short").await;
        assert_eq!(doc.body, "A short but real note.");
    }
}
