use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::app::{GleanerError, Result};

/// A `<sitemap>` or `<url>` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    #[serde(default)]
    pub lastmod: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SitemapIndex {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<SitemapEntry>,
}

#[derive(Debug, Deserialize)]
struct UrlSet {
    #[serde(rename = "url", default)]
    urls: Vec<SitemapEntry>,
}

static DATE_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("static regex"));

/// Child sitemaps listed by a `<sitemapindex>`.
pub fn parse_sitemap_index(body: &[u8]) -> Result<Vec<SitemapEntry>> {
    let index: SitemapIndex = decode(body)?;
    Ok(clean(index.sitemaps))
}

/// Page URLs listed by a `<urlset>`.
pub fn parse_urlset(body: &[u8]) -> Result<Vec<SitemapEntry>> {
    let set: UrlSet = decode(body)?;
    Ok(clean(set.urls))
}

/// `lastmod` is `YYYY-MM-DD`, optionally followed by a W3C time part.
pub fn parse_lastmod(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// First `YYYY-MM-DD` in a URL, e.g. `.../posts/2024/posts-2024-02-26.xml`.
pub fn date_in_url(url: &str) -> Option<NaiveDate> {
    DATE_IN_URL
        .find(url)
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

fn decode<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T> {
    let text = String::from_utf8_lossy(body);
    quick_xml::de::from_str(&text).map_err(|e| GleanerError::SitemapParse(e.to_string()))
}

fn clean(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    entries
        .into_iter()
        .map(|e| SitemapEntry {
            loc: e.loc.trim().to_string(),
            lastmod: e.lastmod.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        })
        .filter(|e| !e.loc.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap>
    <loc>https://medium.com/sitemap/posts/2024/posts-2024-02-26.xml</loc>
  </sitemap>
  <sitemap>
    <loc>https://medium.com/sitemap/users/2024/users-2024-02-26.xml</loc>
    <lastmod>2024-02-27</lastmod>
  </sitemap>
</sitemapindex>"#;

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>
      https://medium.com/@someone/a-post-589a9363ed5c
    </loc>
    <lastmod>2024-02-26</lastmod>
    <changefreq>monthly</changefreq>
    <priority>0.5</priority>
  </url>
  <url>
    <loc>https://medium.com/@someone/another-post-1234</loc>
  </url>
</urlset>"#;

    #[test]
    fn test_parse_index() {
        let children = parse_sitemap_index(INDEX.as_bytes()).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0].loc,
            "https://medium.com/sitemap/posts/2024/posts-2024-02-26.xml"
        );
        assert_eq!(children[0].lastmod, None);
        assert_eq!(children[1].lastmod.as_deref(), Some("2024-02-27"));
    }

    #[test]
    fn test_parse_urlset_trims_and_ignores_extra_fields() {
        let urls = parse_urlset(URLSET.as_bytes()).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].loc, "https://medium.com/@someone/a-post-589a9363ed5c");
        assert_eq!(urls[0].lastmod.as_deref(), Some("2024-02-26"));
        assert_eq!(urls[1].lastmod, None);
    }

    #[test]
    fn test_empty_urlset() {
        let urls = parse_urlset(br#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#)
            .unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_decode_error() {
        let err = parse_urlset(b"<urlset><url><loc>https://x/a</url>").unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_parse_lastmod() {
        assert_eq!(parse_lastmod("2024-02-26"), NaiveDate::from_ymd_opt(2024, 2, 26));
        assert_eq!(
            parse_lastmod("2024-02-26T10:00:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 2, 26)
        );
        assert_eq!(parse_lastmod("26/02/2024"), None);
        assert_eq!(parse_lastmod(""), None);
    }

    #[test]
    fn test_date_in_url() {
        assert_eq!(
            date_in_url("https://medium.com/sitemap/posts/2024/posts-2024-02-26.xml"),
            NaiveDate::from_ymd_opt(2024, 2, 26)
        );
        assert_eq!(date_in_url("https://medium.com/sitemap/tags.xml"), None);
    }
}
