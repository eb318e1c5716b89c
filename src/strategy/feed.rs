use tracing::debug;

use crate::app::Result;
use crate::domain::{DateWindow, Document};
use crate::fetcher::FetchResponse;
use crate::normalizer::parse_feed;
use crate::store::DedupStore;
use crate::strategy::{FetchTask, TraversalStrategy};

/// Flat RSS/Atom feed: each recent item becomes a document and a body fetch.
#[derive(Debug, Clone)]
pub struct FeedStrategy {
    url: String,
    source: String,
    window: DateWindow,
}

impl FeedStrategy {
    pub fn new(url: impl Into<String>, source: impl Into<String>, window: DateWindow) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
            window,
        }
    }
}

impl TraversalStrategy for FeedStrategy {
    fn name(&self) -> &str {
        &self.source
    }

    fn seed(&self) -> FetchTask {
        FetchTask::index(&self.url)
    }

    fn on_index_response(
        &self,
        response: &FetchResponse,
        store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        let entries = parse_feed(&response.body)?;
        let mut next = Vec::new();

        for entry in entries {
            let Some(link) = entry.link else {
                continue;
            };
            let Some(published) = entry.published.filter(|p| self.window.contains(*p)) else {
                debug!(url = %link, "Feed item outside window");
                continue;
            };

            let document = Document {
                title: entry.title.unwrap_or_default(),
                author: entry.author.unwrap_or_default(),
                publish_date: published.timestamp(),
                ..Document::new(link.as_str()).with_source(&self.source)
            };

            if store.insert_new(document).is_some() {
                next.push(FetchTask::body(link));
            }
        }

        debug!(feed = %self.url, queued = next.len(), "Scanned feed");
        Ok(next)
    }
}
