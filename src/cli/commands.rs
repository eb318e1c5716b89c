use std::sync::Arc;

use tracing::warn;
use url::Url;

use crate::app::{AppContext, Result};
use crate::domain::{to_pretty_json, DateWindow, Document};
use crate::strategy::{FeedStrategy, IndexedApiStrategy, Preset, SitemapStrategy, TraversalStrategy};

pub async fn collect_preset(ctx: &AppContext, preset: Preset) -> Result<Vec<Document>> {
    collect_with(ctx, preset.strategy(ctx.config.window_days)).await
}

pub async fn collect_feed(ctx: &AppContext, url: &str, name: Option<String>) -> Result<Vec<Document>> {
    let source = source_label(url, name)?;
    let strategy = FeedStrategy::new(url, source, DateWindow::new(ctx.config.window_days));
    collect_with(ctx, Arc::new(strategy)).await
}

pub async fn collect_sitemap(
    ctx: &AppContext,
    url: &str,
    segment: &str,
    name: Option<String>,
) -> Result<Vec<Document>> {
    let source = source_label(url, name)?;
    let strategy = SitemapStrategy::new(url, source, segment, DateWindow::new(ctx.config.window_days));
    collect_with(ctx, Arc::new(strategy)).await
}

pub async fn collect_api(
    ctx: &AppContext,
    ids_url: &str,
    item_url: &str,
    kind: &str,
    name: Option<String>,
) -> Result<Vec<Document>> {
    let source = source_label(ids_url, name)?;
    let strategy = IndexedApiStrategy::new(ids_url, item_url, source).with_kind(kind);
    collect_with(ctx, Arc::new(strategy)).await
}

pub async fn collect_pages(ctx: &AppContext, urls: &[String]) -> Result<Vec<Document>> {
    let collector = ctx.generic_collector();
    let mut documents = Vec::with_capacity(urls.len());
    for url in urls {
        if let Err(e) = Url::parse(url) {
            warn!(%url, error = %e, "Skipping invalid URL");
            continue;
        }
        documents.push(collector.collect(url).await);
    }
    Ok(documents)
}

pub fn print_documents(documents: &[Document]) {
    println!("{}", to_pretty_json(documents));
}

async fn collect_with(ctx: &AppContext, strategy: Arc<dyn TraversalStrategy>) -> Result<Vec<Document>> {
    Ok(ctx.collector(strategy).collect_site().await)
}

/// Explicit name, or the host of the seed URL.
fn source_label(url: &str, name: Option<String>) -> Result<String> {
    let parsed = Url::parse(url)?;
    Ok(name.unwrap_or_else(|| parsed.host_str().unwrap_or_default().to_string()))
}
