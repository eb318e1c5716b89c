//! # gleaner
//!
//! Collects recent articles from heterogeneous sources into flat
//! [`Document`](domain::Document) records.
//!
//! ## Architecture
//!
//! ```text
//! Strategy seed → Fetcher → Normalizer → DedupStore ─→ body fetch → Extractor
//!       ↑                        │
//!       └──── follow-up fetches ─┘
//! ```
//!
//! A [`Collector`](collector::Collector) drains a frontier of role-tagged
//! fetches. The configured [`TraversalStrategy`](strategy::TraversalStrategy)
//! turns index responses into more fetches and new documents; article pages
//! are filled in by the [`ContentExtractor`](extractor::ContentExtractor).
//!
//! ## Quick Start
//!
//! ```bash
//! # A built-in source
//! gleaner site hackers-news
//!
//! # Any RSS/Atom feed, last week
//! gleaner --days 7 feed https://blog.rust-lang.org/feed.xml
//!
//! # Single pages
//! gleaner page https://example.com/post
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct builds the fetcher stack from
/// the config and hands out collectors.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Frontier-driven traversal.
pub mod collector;

/// Configuration loaded from `~/.config/gleaner/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Document`](domain::Document): one collected article
/// - [`DateWindow`](domain::DateWindow): trailing date filter with one day of slack
pub mod domain;

/// Readability-style article extraction.
pub mod extractor;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`CachedFetcher`](fetcher::cache::CachedFetcher): on-disk cache keyed by URL hash
pub mod fetcher;

/// Parsing of feed, sitemap and item API payloads.
pub mod normalizer;

/// URL-keyed document store shared by concurrent handlers.
pub mod store;

/// Per-source discovery: feed, sitemap and indexed API.
pub mod strategy;
