use chrono::{DateTime, Utc};
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{GleanerError, Result};

/// One `<item>` / `<entry>` of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub link: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = parser::parse(body).map_err(|e| GleanerError::FeedParse(e.to_string()))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| FeedEntry {
            link: entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .filter(|l| !l.is_empty()),
            title: entry
                .title
                .map(|t| decode_html_entities(t.content.trim()).to_string()),
            author: entry
                .authors
                .first()
                .map(|a| a.name.trim().to_string())
                .filter(|a| !a.is_empty()),
            published: entry.published.or(entry.updated),
        })
        .collect();

    Ok(entries)
}
