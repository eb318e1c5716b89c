//! Generic article extraction from raw HTML.
//!
//! # Architecture
//!
//! ```text
//! raw HTML → boilerplate filter → paragraph voting → best container → plain text
//!          → metadata (headline, published time)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use gleaner::extractor::{ContentExtractor, ExtractorConfig};
//!
//! let extractor = ContentExtractor::new(ExtractorConfig::default());
//! let article = extractor.extract(&html, "https://example.com/post")?;
//! println!("{}: {} chars", article.title, article.body.len());
//! ```

mod config;
mod metadata;
mod scoring;

pub use config::ExtractorConfig;
pub use metadata::parse_datetime;

use chrono::{DateTime, Utc};
use scraper::Html;
use url::Url;

use crate::app::{GleanerError, Result};

/// What the heuristic found on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Detected headline, empty when the page has none
    pub title: String,
    /// Plain-text article body, never empty
    pub body: String,
    /// Publish time embedded in the page's metadata
    pub published: Option<DateTime<Utc>>,
    /// Host of the page, used as a provenance label
    pub site: Option<String>,
}

/// Readability-style main content extractor
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    config: ExtractorConfig,
}

impl ContentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the article from `html`.
    ///
    /// Returns [`GleanerError::Extraction`] when no container yields at least
    /// `min_content_chars` of text. Callers leave the document untouched then.
    pub fn extract(&self, html: &str, base_url: &str) -> Result<Extraction> {
        let doc = Html::parse_document(html);

        let body = scoring::best_candidate(&doc, &self.config)
            .map(|el| scoring::render_text(el, &self.config))
            .unwrap_or_default();

        if body.chars().count() < self.config.min_content_chars.max(1) {
            return Err(GleanerError::Extraction(base_url.to_string()));
        }

        Ok(Extraction {
            title: metadata::detect_title(&doc).unwrap_or_default(),
            body,
            published: metadata::detect_published(&doc),
            site: Url::parse(base_url)
                .ok()
                .and_then(|u| u.host_str().map(String::from)),
        })
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
