//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl-and-compile cycle end-to-end.

use docweave::cache::PageCache;
use docweave::config::Config;
use docweave::crawler::{crawl_and_compile, CrawlRequest, Crawler, HttpFetcher};
use docweave::ErrorKind;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`, expecting it to be fetched `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn html(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
        title, body
    )
}

fn seed(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("mock server URI is valid")
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&Config::default()).expect("Failed to build HTTP client")
}

#[tokio::test]
async fn test_full_crawl_and_compile() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &server,
        "/",
        html(
            "Demo",
            r#"<h1>Demo</h1><p>A demo library.</p>
            <a href="/guide">Guide</a>
            <a href="/api">API</a>
            <a href="/pricing">Pricing</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/guide",
        html(
            "Guide",
            r#"<h2>Install</h2><p>Add it to your project.</p>
            <pre class="language-rust">let demo = Demo::new();</pre>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/api",
        html(
            "API",
            r#"<h2>Demo::new</h2><code>fn new() -> Demo</code><p>Creates a demo.</p>"#,
        ),
        1,
    )
    .await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let request = CrawlRequest::new(seed(&server), "demo");
    let document = crawl_and_compile(&fetcher(), &cache, &request)
        .await
        .expect("Crawl failed");

    assert!(document.starts_with("# demo Documentation\n"));
    assert!(document.contains("- **Pages**: 3\n"));
    assert!(document.contains("- [Demo](#demo)\n- [Guide](#guide)\n- [API](#api)\n"));
    assert!(document.contains("### Code Examples"));
    assert!(document.contains("```rust\nlet demo = Demo::new();\n```"));
    assert!(document.contains("#### Demo::new"));
    assert!(document.contains("Creates a demo."));
    assert!(!document.contains("Pricing"));

    let home = document.find("\n## Demo\n").expect("missing home section");
    let guide = document.find("\n## Guide\n").expect("missing guide section");
    let api = document.find("\n## API\n").expect("missing api section");
    assert!(home < guide && guide < api);
}

#[tokio::test]
async fn test_seed_not_found_is_crawl_exhausted() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let seed = seed(&server);
    let request = CrawlRequest::new(seed.clone(), "demo");
    let err = crawl_and_compile(&fetcher(), &cache, &request)
        .await
        .expect_err("Crawl should fail");

    assert_eq!(err.kind(), ErrorKind::CrawlExhausted);
    let message = err.to_string();
    assert!(message.contains(seed.as_str()), "message: {}", message);
    assert!(message.contains("404"), "message: {}", message);
}

#[tokio::test]
async fn test_non_html_seed_is_crawl_exhausted() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let request = CrawlRequest::new(seed(&server), "demo");
    let err = crawl_and_compile(&fetcher(), &cache, &request)
        .await
        .expect_err("Crawl should fail");

    assert_eq!(err.kind(), ErrorKind::CrawlExhausted);
}

#[tokio::test]
async fn test_cross_host_links_are_not_followed() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &server,
        "/",
        html(
            "Home",
            r#"<a href="https://elsewhere.example.com/docs">External docs</a>
            <a href="/docs">Docs</a>"#,
        ),
        1,
    )
    .await;
    mount_page(&server, "/docs", html("Docs", "<h1>Docs</h1>"), 1).await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let report = crawler
        .crawl(&CrawlRequest::new(seed(&server), "demo"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            seed(&server).to_string(),
            format!("{}/docs", server.uri())
        ]
    );
    assert_eq!(report.failures, 0);
    assert_eq!(report.visited, 2);
}

#[tokio::test]
async fn test_budget_stops_before_remaining_links() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &server,
        "/",
        html(
            "Home",
            r#"<a href="/guide-1">Guide 1</a>
            <a href="/guide-2">Guide 2</a>
            <a href="/guide-3">Guide 3</a>"#,
        ),
        1,
    )
    .await;
    mount_page(&server, "/guide-1", html("Guide 1", "<h1>One</h1>"), 1).await;
    mount_page(&server, "/guide-2", html("Guide 2", "<h1>Two</h1>"), 0).await;
    mount_page(&server, "/guide-3", html("Guide 3", "<h1>Three</h1>"), 0).await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let report = crawler
        .crawl(&CrawlRequest::new(seed(&server), "demo").with_max_pages(2))
        .await
        .expect("Crawl failed");

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Guide 1"]);

    // Expectations on the mocks are verified here
    server.verify().await;
}

#[tokio::test]
async fn test_second_crawl_is_served_from_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&server, "/", html("Home", "<h1>Home</h1><p>Welcome.</p>"), 1).await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let request = CrawlRequest::new(seed(&server), "demo");

    let first = crawler.crawl(&request).await.expect("First crawl failed");
    let second = crawler.crawl(&request).await.expect("Second crawl failed");

    assert_eq!(first.cache_hits, 0);
    assert_eq!(second.cache_hits, 1);
    assert_eq!(first.pages, second.pages);
}

#[tokio::test]
async fn test_cache_bypass_refetches() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&server, "/", html("Home", "<h1>Home</h1>"), 2).await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let request = CrawlRequest::new(seed(&server), "demo").with_cache_bypass(true);

    crawler.crawl(&request).await.expect("First crawl failed");
    let second = crawler.crawl(&request).await.expect("Second crawl failed");

    assert_eq!(second.cache_hits, 0);
    assert!(cache.get(seed(&server).as_str()).is_some());
}

#[tokio::test]
async fn test_redirected_seed_resolves_links_against_final_url() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/docs/",
        html("Docs", r#"<h1>Docs</h1><a href="api">API</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/docs/api", html("API", "<h1>API</h1>"), 1).await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let seed = Url::parse(&format!("{}/docs", server.uri())).expect("valid seed");
    let report = crawler
        .crawl(&CrawlRequest::new(seed, "demo"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/docs/", server.uri()),
            format!("{}/docs/api", server.uri())
        ]
    );
    assert_eq!(report.failures, 0);

    server.verify().await;
}

#[tokio::test]
async fn test_redirect_off_host_is_dropped() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp dir");
    let port = Url::parse(&server.uri())
        .expect("mock server URI is valid")
        .port()
        .expect("mock server has a port");

    mount_page(
        &server,
        "/",
        html("Home", r#"<h1>Home</h1><a href="/guide">Guide</a>"#),
        1,
    )
    .await;
    // Same server under a different host name
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("http://localhost:{}/landing", port).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html("Landing", "<h1>Landing</h1>"))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let cache = PageCache::with_default_ttl(cache_dir.path());
    let fetcher = fetcher();
    let crawler = Crawler::new(&fetcher, &cache);
    let report = crawler
        .crawl(&CrawlRequest::new(seed(&server), "demo"))
        .await
        .expect("Crawl failed");

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home"]);
    assert_eq!(report.failures, 1);
}
