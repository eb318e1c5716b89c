use tracing::debug;

use crate::app::Result;
use crate::domain::window::midnight_utc;
use crate::domain::{DateWindow, Document};
use crate::extractor::Extraction;
use crate::fetcher::FetchResponse;
use crate::normalizer::{date_in_url, parse_lastmod, parse_sitemap_index, parse_urlset};
use crate::store::DedupStore;
use crate::strategy::{FetchTask, TraversalStrategy};

/// Only child sitemaps whose URL contains this segment are followed by default.
pub const DEFAULT_SEGMENT: &str = "/posts/";

/// Two-level sitemap: index → recent child sitemaps → recent pages.
#[derive(Debug, Clone)]
pub struct SitemapStrategy {
    url: String,
    source: String,
    segment: String,
    window: DateWindow,
}

impl SitemapStrategy {
    pub fn new(
        url: impl Into<String>,
        source: impl Into<String>,
        segment: impl Into<String>,
        window: DateWindow,
    ) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
            segment: segment.into(),
            window,
        }
    }
}

impl TraversalStrategy for SitemapStrategy {
    fn name(&self) -> &str {
        &self.source
    }

    fn seed(&self) -> FetchTask {
        FetchTask::index(&self.url)
    }

    fn on_index_response(
        &self,
        response: &FetchResponse,
        _store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        let children = parse_sitemap_index(&response.body)?;

        let next: Vec<_> = children
            .into_iter()
            .filter(|child| child.loc.contains(&self.segment))
            .filter(|child| {
                // The child's own URL carries its date; lastmod is the fallback.
                date_in_url(&child.loc)
                    .or_else(|| child.lastmod.as_deref().and_then(parse_lastmod))
                    .is_some_and(|day| self.window.contains_day(day))
            })
            .map(|child| FetchTask::leaf(child.loc))
            .collect();

        debug!(index = %response.url, queued = next.len(), "Scanned sitemap index");
        Ok(next)
    }

    fn on_leaf_response(
        &self,
        response: &FetchResponse,
        store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        let urls = parse_urlset(&response.body)?;
        let mut next = Vec::new();

        for entry in urls {
            let Some(day) = entry.lastmod.as_deref().and_then(parse_lastmod) else {
                continue;
            };
            if !self.window.contains_day(day) {
                continue;
            }

            let document = Document {
                publish_date: midnight_utc(day).timestamp(),
                ..Document::new(entry.loc.as_str()).with_source(&self.source)
            };
            if store.insert_new(document).is_some() {
                next.push(FetchTask::body(entry.loc));
            }
        }

        debug!(sitemap = %response.url, queued = next.len(), "Scanned leaf sitemap");
        Ok(next)
    }

    /// Sitemaps carry no titles, so the page's own headline and text win.
    fn apply_extraction(&self, document: &mut Document, extraction: Extraction) {
        if !extraction.title.is_empty() {
            document.title = extraction.title;
        }
        document.body = extraction.body;
    }
}
