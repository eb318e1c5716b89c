use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::app::error::{GleanerError, Result};
use crate::collector::Collector;
use crate::config::Config;
use crate::extractor::ContentExtractor;
use crate::fetcher::cache::CachedFetcher;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::strategy::TraversalStrategy;

/// Wires the configured fetcher stack into collectors.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        if config.window_days < 0 {
            return Err(GleanerError::Config(format!(
                "window_days must not be negative (got {})",
                config.window_days
            )));
        }

        let http = HttpFetcher::new(&config.user_agent, Duration::from_secs(config.timeout_secs))?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> = match config.cache_path() {
            Some(dir) => {
                debug!(dir = %dir.display(), "Using page cache");
                Arc::new(CachedFetcher::new(http, dir))
            }
            None => Arc::new(http),
        };

        Ok(Self { config, fetcher })
    }

    /// A context over an arbitrary fetcher, e.g. a stub in tests.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self { config, fetcher }
    }

    pub fn collector(&self, strategy: Arc<dyn TraversalStrategy>) -> Collector {
        self.configure(Collector::new(self.fetcher.clone(), strategy))
    }

    /// Collector for single-URL mode.
    pub fn generic_collector(&self) -> Collector {
        self.configure(Collector::generic(self.fetcher.clone()))
    }

    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.config.cache_path()
    }

    fn configure(&self, collector: Collector) -> Collector {
        collector
            .with_workers(self.config.max_concurrency)
            .with_extractor(ContentExtractor::new(self.config.extractor.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_disabled_by_empty_dir() {
        let config = Config {
            cache_dir: String::new(),
            ..Config::default()
        };
        let ctx = AppContext::new(config).unwrap();
        assert!(ctx.cache_dir().is_none());
    }

    #[test]
    fn test_cache_dir_from_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            cache_dir: tmp.path().display().to_string(),
            ..Config::default()
        };
        let ctx = AppContext::new(config).unwrap();
        assert_eq!(ctx.cache_dir(), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_negative_window_is_rejected() {
        let config = Config {
            window_days: -1,
            cache_dir: String::new(),
            ..Config::default()
        };
        assert!(matches!(AppContext::new(config), Err(GleanerError::Config(_))));
    }

    #[tokio::test]
    async fn test_generic_collector_uses_context_fetcher() {
        let ctx = AppContext::new(Config {
            cache_dir: String::new(),
            ..Config::default()
        })
        .unwrap();
        let collector = ctx.generic_collector();
        assert!(collector.collect_site().await.is_empty());
    }
}
