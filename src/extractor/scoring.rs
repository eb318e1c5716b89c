//! Main-content detection.
//!
//! Paragraph-like elements vote for their parent and grandparent containers;
//! the container with the highest link-density-adjusted score wins.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extractor::config::ExtractorConfig;
use crate::extractor::normalize_whitespace;

static PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, pre, td, blockquote").expect("static selector"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("static selector"));
static FALLBACKS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", r#"[itemprop="articleBody"]"#, "main"]
        .into_iter()
        .map(|css| Selector::parse(css).expect("static selector"))
        .collect()
});

static UNLIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)comment|community|disqus|footer|footnote|masthead|menu|nav|related|remark|share|shoutbox|sidebar|skyscraper|social|sponsor|promo|popup|banner|cookie|subscribe|newsletter|pagination|pager|\bads?\b|ad-break",
    )
    .expect("static regex")
});
static LIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|post|text|blog|story|column")
        .expect("static regex")
});

const BLOCK_TAGS: [&str; 10] = ["p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "pre", "blockquote"];
const STRUCTURAL_TAGS: [&str; 4] = ["html", "body", "article", "main"];

/// Find the element most likely to hold the article text.
pub fn best_candidate<'a>(doc: &'a Html, config: &ExtractorConfig) -> Option<ElementRef<'a>> {
    let mut candidates: HashMap<_, (ElementRef<'a>, f64)> = HashMap::new();

    for paragraph in doc.select(&PARAGRAPHS) {
        if is_boilerplate(paragraph, config) {
            continue;
        }

        let text = normalize_whitespace(&paragraph.text().collect::<String>());
        let len = text.chars().count();
        if len < config.min_paragraph_chars {
            continue;
        }

        let commas = text.matches(',').count() as f64;
        let score = 1.0 + commas + (len as f64 / 100.0).floor().min(3.0);

        let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        candidates
            .entry(parent.id())
            .or_insert_with(|| (parent, initial_score(parent)))
            .1 += score;

        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            candidates
                .entry(grandparent.id())
                .or_insert_with(|| (grandparent, initial_score(grandparent)))
                .1 += score / 2.0;
        }
    }

    candidates
        .into_values()
        .map(|(el, score)| (el, score * (1.0 - link_density(el))))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(el, _)| el)
        .or_else(|| {
            FALLBACKS
                .iter()
                .find_map(|sel| doc.select(sel).next())
        })
}

/// Plain-text rendering of `container`: one line per block, blank line between.
pub fn render_text(container: ElementRef<'_>, config: &ExtractorConfig) -> String {
    let mut blocks = Vec::new();

    for el in container.descendants().filter_map(ElementRef::wrap) {
        let tag = el.value().name();
        if !BLOCK_TAGS.contains(&tag) || inside_block(el, container) || is_boilerplate(el, config) {
            continue;
        }
        let text = normalize_whitespace(&el.text().collect::<String>());
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    if blocks.is_empty() {
        return visible_text(container, config);
    }
    blocks.join("\n\n")
}

/// Share of `el`'s text that sits inside links.
pub fn link_density(el: ElementRef<'_>) -> f64 {
    let total = el.text().map(|t| t.trim().chars().count()).sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let linked = el
        .select(&LINKS)
        .flat_map(|a| a.text())
        .map(|t| t.trim().chars().count())
        .sum::<usize>();
    (linked as f64 / total as f64).min(1.0)
}

/// Class/id hint: +25 for content-looking names, -25 for chrome-looking ones.
pub fn class_weight(el: ElementRef<'_>) -> f64 {
    let hints = class_and_id(el);
    if hints.is_empty() {
        return 0.0;
    }
    let mut weight = 0.0;
    if UNLIKELY.is_match(&hints) {
        weight -= 25.0;
    }
    if LIKELY.is_match(&hints) {
        weight += 25.0;
    }
    weight
}

fn initial_score(el: ElementRef<'_>) -> f64 {
    let base = match el.value().name() {
        "div" | "article" | "section" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    base + class_weight(el)
}

/// True when `el` or any ancestor is page chrome rather than content.
fn is_boilerplate(el: ElementRef<'_>, config: &ExtractorConfig) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|node| {
            let tag = node.value().name();
            if config.is_boilerplate_tag(tag) {
                return true;
            }
            if STRUCTURAL_TAGS.contains(&tag) {
                return false;
            }
            let hints = class_and_id(node);
            !hints.is_empty() && UNLIKELY.is_match(&hints) && !LIKELY.is_match(&hints)
        })
}

fn inside_block(el: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|node| BLOCK_TAGS.contains(&node.value().name()))
}

fn visible_text(container: ElementRef<'_>, config: &ExtractorConfig) -> String {
    let mut out = String::new();
    for node in container.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != container.id())
            .filter_map(ElementRef::wrap)
            .any(|a| config.is_boilerplate_tag(a.value().name()));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    normalize_whitespace(&out)
}

fn class_and_id(el: ElementRef<'_>) -> String {
    let value = el.value();
    let class = value.attr("class").unwrap_or_default();
    let id = value.attr("id").unwrap_or_default();
    format!("{} {}", class, id).trim().to_string()
}
