//! Content-addressed on-disk response cache.
//!
//! Entries live at `<dir>/<first two hex chars>/<sha256(url) hex>` and hold the
//! final URL on the first line followed by the raw body. Only successful
//! responses are written. The cache only saves network round trips; any I/O
//! problem falls through to the wrapped fetcher.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::app::Result;
use crate::fetcher::{FetchResponse, Fetcher};

pub struct CachedFetcher<F> {
    inner: F,
    dir: PathBuf,
}

impl<F: Fetcher + Send + Sync> CachedFetcher<F> {
    pub fn new(inner: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file path for a request URL.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let key = cache_key(url);
        self.dir.join(&key[..2]).join(key)
    }

    async fn read_entry(&self, path: &Path) -> Option<FetchResponse> {
        let raw = tokio::fs::read(path).await.ok()?;
        decode_entry(&raw)
    }

    async fn write_entry(&self, path: &Path, response: &FetchResponse) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, encode_entry(response)).await
    }
}

#[async_trait]
impl<F: Fetcher + Send + Sync> Fetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let path = self.entry_path(url);

        if let Some(cached) = self.read_entry(&path).await {
            debug!(%url, "Cache hit");
            return Ok(cached);
        }

        let response = self.inner.fetch(url).await?;

        if let Err(e) = self.write_entry(&path, &response).await {
            warn!(%url, error = %e, "Failed to write response cache entry");
        }

        Ok(response)
    }
}

pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

fn encode_entry(response: &FetchResponse) -> Vec<u8> {
    let mut raw = Vec::with_capacity(response.url.len() + 1 + response.body.len());
    raw.extend_from_slice(response.url.as_bytes());
    raw.push(b'\n');
    raw.extend_from_slice(&response.body);
    raw
}

fn decode_entry(raw: &[u8]) -> Option<FetchResponse> {
    let split = raw.iter().position(|b| *b == b'\n')?;
    let url = std::str::from_utf8(&raw[..split]).ok()?;
    if url.is_empty() {
        return None;
    }
    Some(FetchResponse::new(url, &raw[split + 1..]))
}
