//! Decoding of discovery payloads into plain records.
//!
//! - [`feed`]: RSS 0.9x/1.0/2.0 and Atom via feed-rs
//! - [`sitemap`]: sitemap indexes and `urlset` leaves
//! - [`api`]: JSON id lists and item records
//!
//! Every parser returns a decode error instead of partial output, so a
//! malformed response never creates or mutates a document.

pub mod api;
pub mod feed;
pub mod sitemap;

pub use api::{parse_ids, parse_item, ApiItem};
pub use feed::{parse_feed, FeedEntry};
pub use sitemap::{date_in_url, parse_lastmod, parse_sitemap_index, parse_urlset, SitemapEntry};
