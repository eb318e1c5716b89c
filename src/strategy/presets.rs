use std::sync::Arc;

use clap::ValueEnum;

use crate::domain::DateWindow;
use crate::strategy::{
    FeedStrategy, IndexedApiStrategy, SitemapStrategy, TraversalStrategy, DEFAULT_SEGMENT,
};

pub const THE_HACKERS_NEWS_SOURCE: &str = "THE HACKERS NEWS";
pub const YC_HACKER_NEWS_SOURCE: &str = "YC HACKER NEWS";
pub const MEDIUM_SOURCE: &str = "MEDIUM";

pub const THE_HACKERS_NEWS_SITE: &str = "https://feeds.feedburner.com/TheHackersNews";
pub const YC_HACKER_NEWS_SITE: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";
pub const YC_HACKER_NEWS_ITEM: &str = "https://hacker-news.firebaseio.com/v0/item/{id}.json";
pub const MEDIUM_SITE: &str = "https://medium.com/sitemap/sitemap.xml";

/// Built-in sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// The Hacker News RSS feed
    HackersNews,
    /// Hacker News top stories API
    YcHackerNews,
    /// Medium posts sitemap
    Medium,
}

impl Preset {
    /// The window applies to the feed and sitemap sources only.
    pub fn strategy(self, window_days: i64) -> Arc<dyn TraversalStrategy> {
        let window = DateWindow::new(window_days);
        match self {
            Preset::HackersNews => Arc::new(FeedStrategy::new(
                THE_HACKERS_NEWS_SITE,
                THE_HACKERS_NEWS_SOURCE,
                window,
            )),
            Preset::YcHackerNews => Arc::new(IndexedApiStrategy::new(
                YC_HACKER_NEWS_SITE,
                YC_HACKER_NEWS_ITEM,
                YC_HACKER_NEWS_SOURCE,
            )),
            Preset::Medium => Arc::new(SitemapStrategy::new(
                MEDIUM_SITE,
                MEDIUM_SOURCE,
                DEFAULT_SEGMENT,
                window,
            )),
        }
    }
}
