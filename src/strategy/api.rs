use tracing::debug;

use crate::app::Result;
use crate::domain::Document;
use crate::fetcher::FetchResponse;
use crate::normalizer::{parse_ids, parse_item};
use crate::store::DedupStore;
use crate::strategy::{FetchTask, TraversalStrategy};

pub const DEFAULT_ITEM_KIND: &str = "story";

/// Index + detail REST API: id list → one item record per id → linked article.
#[derive(Debug, Clone)]
pub struct IndexedApiStrategy {
    ids_url: String,
    /// Detail URL with an `{id}` placeholder
    item_url: String,
    kind: String,
    source: String,
}

impl IndexedApiStrategy {
    pub fn new(
        ids_url: impl Into<String>,
        item_url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            ids_url: ids_url.into(),
            item_url: item_url.into(),
            kind: DEFAULT_ITEM_KIND.to_string(),
            source: source.into(),
        }
    }

    /// Accept item records of another `type` than `story`.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn item_url(&self, id: i64) -> String {
        self.item_url.replace("{id}", &id.to_string())
    }
}

impl TraversalStrategy for IndexedApiStrategy {
    fn name(&self) -> &str {
        &self.source
    }

    fn seed(&self) -> FetchTask {
        FetchTask::index(&self.ids_url)
    }

    fn on_index_response(
        &self,
        response: &FetchResponse,
        _store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        let ids = parse_ids(&response.body)?;
        debug!(index = %response.url, ids = ids.len(), "Scanned id list");

        Ok(ids
            .into_iter()
            .map(|id| FetchTask::detail(self.item_url(id)))
            .collect())
    }

    fn on_detail_response(
        &self,
        response: &FetchResponse,
        store: &DedupStore,
    ) -> Result<Vec<FetchTask>> {
        let item = parse_item(&response.body)?;

        if item.kind != self.kind || item.url.is_empty() {
            debug!(item = %response.url, kind = %item.kind, "Skipping non-article item");
            return Ok(Vec::new());
        }

        let document = Document {
            title: item.title,
            author: item.by,
            publish_date: item.time,
            comments: item.kids.len() as i64,
            likes: item.score,
            ..Document::new(item.url.as_str()).with_source(&self.source)
        };

        match store.insert_new(document) {
            Some(_) => Ok(vec![FetchTask::body(item.url)]),
            None => Ok(Vec::new()),
        }
    }
}
