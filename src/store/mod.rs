//! Transient, URL-keyed document store.
//!
//! Every lookup and insertion goes through one mutex so that concurrent
//! discovery branches racing on the same URL converge on one [`Document`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::Document;

/// Shared handle to a stored document.
///
/// Cloning the handle does not clone the document: all clones observe and
/// mutate the same record.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    url: Arc<str>,
    inner: Arc<Mutex<Document>>,
}

impl DocumentHandle {
    fn new(document: Document) -> Self {
        Self {
            url: Arc::from(document.url.as_str()),
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// The dedup key; fixed at creation.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    /// Mutate the document in place. The URL is restored afterwards so the
    /// record's identity cannot drift from its key.
    pub fn update<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut doc = self.lock();
        let result = f(&mut doc);
        if doc.url.as_str() != &*self.url {
            doc.url = self.url.to_string();
        }
        result
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_url: HashMap<String, DocumentHandle>,
    order: Vec<DocumentHandle>,
}

impl Entries {
    fn insert(&mut self, document: Document) -> DocumentHandle {
        let handle = DocumentHandle::new(document);
        self.by_url.insert(handle.url().to_string(), handle.clone());
        self.order.push(handle.clone());
        handle
    }
}

#[derive(Debug, Default)]
pub struct DedupStore {
    entries: Mutex<Entries>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, url: &str) -> bool {
        self.entries().by_url.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<DocumentHandle> {
        self.entries().by_url.get(url).cloned()
    }

    /// Return the stored document for `url`, creating a bare one if absent.
    pub fn get_or_create(&self, url: &str) -> DocumentHandle {
        let mut entries = self.entries();
        if let Some(existing) = entries.by_url.get(url) {
            return existing.clone();
        }
        entries.insert(Document::new(url))
    }

    /// Insert `document` unless its URL is already known.
    ///
    /// Returns the new handle, or `None` when another branch got there first.
    /// The check and the insertion happen under one lock.
    pub fn insert_new(&self, document: Document) -> Option<DocumentHandle> {
        let mut entries = self.entries();
        if entries.by_url.contains_key(&document.url) {
            return None;
        }
        Some(entries.insert(document))
    }

    /// Snapshots of every document, in insertion order.
    pub fn list_all(&self) -> Vec<Document> {
        let handles = self.entries().order.clone();
        handles.iter().map(DocumentHandle::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
