use chrono::Utc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gleaner::app::AppContext;
use gleaner::cli::commands;
use gleaner::config::Config;

const PARAGRAPH: &str = "The maintainers shipped a release with faster builds, smaller binaries, and a long list of fixes.";

fn article() -> String {
    format!(
        "<html><head><title>Release Notes For Today</title></head>\
         <body><article><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></article></body></html>"
    )
}

fn feed(base: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Blog</title>
        <item><title>Release</title><link>{base}/post</link><pubDate>{}</pubDate></item>
        </channel></rss>"#,
        Utc::now().to_rfc2822()
    )
}

async fn mount(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&server.uri())))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_feed_over_http_with_cache() {
    let server = MockServer::start().await;
    mount(&server).await;
    let cache = tempfile::tempdir().unwrap();
    let config = Config {
        cache_dir: cache.path().display().to_string(),
        ..Config::default()
    };
    let feed_url = format!("{}/rss", server.uri());

    let first = {
        let ctx = AppContext::new(config.clone()).unwrap();
        commands::collect_feed(&ctx, &feed_url, Some("BLOG".into())).await.unwrap()
    };
    // Served entirely from the cache; the mocks expect one hit each
    let second = {
        let ctx = AppContext::new(config).unwrap();
        commands::collect_feed(&ctx, &feed_url, Some("BLOG".into())).await.unwrap()
    };

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].url, format!("{}/post", server.uri()));
    assert_eq!(first[0].source, "BLOG");
    assert_eq!(first[0].title, "Release");
    assert!(first[0].body.contains("faster builds"));

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].body, first[0].body);
}

#[tokio::test]
async fn test_page_command_without_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article()))
        .mount(&server)
        .await;
    let ctx = AppContext::new(Config {
        cache_dir: String::new(),
        ..Config::default()
    })
    .unwrap();

    let docs = commands::collect_pages(&ctx, &[format!("{}/post", server.uri())])
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Release Notes For Today");
    assert_eq!(docs[0].source, "127.0.0.1");
    assert!(docs[0].body.contains("smaller binaries"));
}
