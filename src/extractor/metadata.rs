//! Headline and publish-time detection from page metadata.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use html_escape::decode_html_entities;
use scraper::{Html, Selector};

use crate::domain::window::midnight_utc;
use crate::extractor::normalize_whitespace;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static TITLE_META: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"meta[property="og:title"]"#,
        r#"meta[name="twitter:title"]"#,
        r#"meta[itemprop="headline"]"#,
    ]
    .into_iter()
    .map(selector)
    .collect()
});

static PUBLISHED_META: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"meta[property="article:published_time"]"#,
        r#"meta[itemprop="datePublished"]"#,
        r#"meta[name="date"]"#,
    ]
    .into_iter()
    .map(selector)
    .collect()
});

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector("time[datetime]"));

const TITLE_SEPARATORS: [&str; 4] = [" | ", " - ", " — ", " :: "];

pub fn detect_title(doc: &Html) -> Option<String> {
    let from_meta = TITLE_META.iter().find_map(|sel| meta_content(doc, sel));
    if from_meta.is_some() {
        return from_meta;
    }

    let from_h1 = doc
        .select(&H1)
        .next()
        .map(|h| normalize_whitespace(&h.text().collect::<String>()))
        .filter(|t| !t.is_empty());
    if from_h1.is_some() {
        return from_h1;
    }

    doc.select(&TITLE)
        .next()
        .map(|t| strip_site_name(&normalize_whitespace(&t.text().collect::<String>())))
        .filter(|t| !t.is_empty())
}

/// "Headline text | Site" → "Headline text", unless the remainder is too short
/// to be a headline on its own.
pub fn strip_site_name(title: &str) -> String {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max();

    match cut {
        Some(idx) if title[..idx].split_whitespace().count() >= 3 => title[..idx].trim().to_string(),
        _ => title.to_string(),
    }
}

pub fn detect_published(doc: &Html) -> Option<DateTime<Utc>> {
    PUBLISHED_META
        .iter()
        .filter_map(|sel| meta_content(doc, sel))
        .find_map(|v| parse_datetime(&v))
        .or_else(|| json_ld_published(doc))
        .or_else(|| {
            doc.select(&TIME)
                .filter_map(|t| t.value().attr("datetime"))
                .find_map(parse_datetime)
        })
}

fn json_ld_published(doc: &Html) -> Option<DateTime<Utc>> {
    doc.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        let value: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
        find_date_published(&value).and_then(parse_datetime)
    })
}

fn find_date_published(value: &serde_json::Value) -> Option<&str> {
    match value {
        serde_json::Value::Object(map) => map
            .get("datePublished")
            .and_then(|v| v.as_str())
            .or_else(|| map.values().find_map(find_date_published)),
        serde_json::Value::Array(items) => items.iter().find_map(find_date_published),
        _ => None,
    }
}

fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .filter_map(|m| m.value().attr("content"))
        .map(|c| normalize_whitespace(&decode_html_entities(c)))
        .find(|c| !c.is_empty())
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` prefix taken at midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            let day = value.get(..10)?;
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .ok()
                .map(midnight_utc)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_title_prefers_open_graph() {
        let doc = Html::parse_document(
            r#"<html><head><title>Ignored | Site</title>
            <meta property="og:title" content="Open &amp; Graph"></head>
            <body><h1>Heading</h1></body></html>"#,
        );
        assert_eq!(detect_title(&doc), Some("Open & Graph".into()));
    }

    #[test]
    fn test_title_falls_back_to_h1_then_title() {
        let doc = Html::parse_document("<html><body><h1> The  Heading </h1></body></html>");
        assert_eq!(detect_title(&doc), Some("The Heading".into()));

        let doc = Html::parse_document(
            "<html><head><title>A Long Enough Headline | Example Site</title></head><body></body></html>",
        );
        assert_eq!(detect_title(&doc), Some("A Long Enough Headline".into()));
    }

    #[test]
    fn test_strip_site_name_keeps_short_titles() {
        assert_eq!(strip_site_name("Rust - Home"), "Rust - Home");
        assert_eq!(
            strip_site_name("Why the borrow checker helps - Blog"),
            "Why the borrow checker helps"
        );
    }

    #[test]
    fn test_published_from_meta() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="article:published_time" content="2024-02-26T20:24:00+05:30"></head></html>"#,
        );
        let expected = Utc.with_ymd_and_hms(2024, 2, 26, 14, 54, 0).unwrap();
        assert_eq!(detect_published(&doc), Some(expected));
    }

    #[test]
    fn test_published_from_json_ld_graph() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[{"@type":"WebSite"},{"@type":"NewsArticle","datePublished":"2024-03-01"}]}
            </script></head></html>"#,
        );
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(detect_published(&doc), Some(expected));
    }

    #[test]
    fn test_published_from_time_element() {
        let doc = Html::parse_document(
            r#"<html><body><time datetime="2023-12-31T23:00:00Z">Dec 31</time></body></html>"#,
        );
        let expected = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(detect_published(&doc), Some(expected));
    }

    #[test]
    fn test_no_published_time() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert_eq!(detect_published(&doc), None);
        assert_eq!(parse_datetime("yesterday"), None);
    }
}
