//! Source-specific discovery topologies.
//!
//! Every fetch is tagged with the [`FetchRole`] it plays in the traversal, so
//! the collector dispatches responses by role instead of by URL shape:
//!
//! ```text
//! Feed:       Index(feed) ───────────────────────────────→ Body(article)*
//! Sitemap:    Index(sitemapindex) → Leaf(urlset)* ───────→ Body(article)*
//! IndexedApi: Index(id list) ─────→ Detail(item json)* ──→ Body(article)*
//! ```
//!
//! Discovery steps create documents through [`DedupStore::insert_new`] and
//! only enqueue a body fetch for the branch that won the insertion.

mod api;
mod feed;
mod presets;
mod sitemap;

pub use api::{IndexedApiStrategy, DEFAULT_ITEM_KIND};
pub use feed::FeedStrategy;
pub use presets::Preset;
pub use sitemap::{SitemapStrategy, DEFAULT_SEGMENT};

use crate::app::Result;
use crate::domain::Document;
use crate::extractor::Extraction;
use crate::fetcher::FetchResponse;
use crate::store::DedupStore;

/// What a fetched response is, within the traversal that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchRole {
    /// Seed of a traversal: feed, sitemap index, or id list
    Index,
    /// Second-level sitemap
    Leaf,
    /// Per-item API record
    Detail,
    /// Article page of a document discovered by the traversal
    Body,
    /// Article page requested directly, outside any traversal
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub url: String,
    pub role: FetchRole,
}

impl FetchTask {
    pub fn new(url: impl Into<String>, role: FetchRole) -> Self {
        Self {
            url: url.into(),
            role,
        }
    }

    pub fn index(url: impl Into<String>) -> Self {
        Self::new(url, FetchRole::Index)
    }

    pub fn leaf(url: impl Into<String>) -> Self {
        Self::new(url, FetchRole::Leaf)
    }

    pub fn detail(url: impl Into<String>) -> Self {
        Self::new(url, FetchRole::Detail)
    }

    pub fn body(url: impl Into<String>) -> Self {
        Self::new(url, FetchRole::Body)
    }

    pub fn page(url: impl Into<String>) -> Self {
        Self::new(url, FetchRole::Page)
    }
}

pub trait TraversalStrategy: Send + Sync {
    /// Provenance label written to `Document::source`.
    fn name(&self) -> &str;

    /// First fetch of the traversal.
    fn seed(&self) -> FetchTask;

    fn on_index_response(
        &self,
        response: &FetchResponse,
        store: &DedupStore,
    ) -> Result<Vec<FetchTask>>;

    fn on_leaf_response(
        &self,
        _response: &FetchResponse,
        _store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        Ok(Vec::new())
    }

    fn on_detail_response(
        &self,
        _response: &FetchResponse,
        _store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        Ok(Vec::new())
    }

    /// Merge an extracted article into a document discovered by this traversal.
    ///
    /// Discovery metadata is trusted by default; only the body is taken.
    fn apply_extraction(&self, document: &mut Document, extraction: Extraction) {
        document.body = extraction.body;
    }
}
