//! End-to-end crawls over HTTP
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! start, poll and finish cycle through `CrawlApi`.

use crate::common::{coordinator, fixed_id_store, wait_until_finished, ScriptedFetcher, BASE};
use std::collections::HashMap;
use std::sync::Arc;
use sumi_seek::config::{config_from_lookup, Config};
use sumi_seek::storage::AnalysisStore;
use sumi_seek::{CrawlApi, CrawlStatus, SeekError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_finds_base_and_linked_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        200,
        "<html><body>Test page <a href='/link1'>Link</a></body></html>",
    )
    .await;
    mount_page(&server, "/link1", 200, "<html><body>more test content</body></html>").await;

    let mut config = Config::with_base_url(server.uri());
    config.crawler.max_results = 5;
    let api = CrawlApi::from_config(&config).expect("Failed to build API");

    let id = api.start_crawl("test").expect("Failed to start crawl").id;
    assert_eq!(id.len(), 8);

    let results = wait_until_finished(&api, &id).await;
    assert_eq!(results.status, CrawlStatus::Done);
    assert_eq!(
        results.urls,
        vec![format!("{}/", server.uri()), format!("{}/link1", server.uri())]
    );
    assert_eq!(results.message, None);
}

#[tokio::test]
async fn test_crawl_stays_under_base_url() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/docs/",
        200,
        "keyword <a href='/docs/a'>in</a> <a href='/blog'>out</a> \
         <a href='https://elsewhere.example/docs/'>far</a>",
    )
    .await;
    mount_page(&server, "/docs/a", 200, "keyword").await;
    mount_page(&server, "/blog", 200, "keyword").await;

    let config = Config::with_base_url(format!("{}/docs/", server.uri()));
    let api = CrawlApi::from_config(&config).expect("Failed to build API");

    let id = api.start_crawl("KEYWORD").expect("Failed to start crawl").id;
    let results = wait_until_finished(&api, &id).await;

    assert_eq!(results.status, CrawlStatus::Done);
    assert_eq!(
        results.urls,
        vec![
            format!("{}/docs/", server.uri()),
            format!("{}/docs/a", server.uri())
        ]
    );
}

#[tokio::test]
async fn test_error_status_pages_are_still_searched() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, "<a href='/gone'>gone</a>").await;
    mount_page(&server, "/gone", 404, "needle not here anymore").await;

    let api = CrawlApi::from_config(&Config::with_base_url(server.uri()))
        .expect("Failed to build API");

    let id = api.start_crawl("needle").expect("Failed to start crawl").id;
    let results = wait_until_finished(&api, &id).await;

    assert_eq!(results.status, CrawlStatus::Done);
    assert_eq!(results.urls, vec![format!("{}/gone", server.uri())]);
}

#[tokio::test]
async fn test_results_size_from_environment_caps_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        200,
        "match <a href='/a'>a</a> <a href='/b'>b</a>",
    )
    .await;
    mount_page(&server, "/a", 200, "match").await;
    mount_page(&server, "/b", 200, "match").await;

    let env: HashMap<&str, String> = HashMap::from([
        ("BASE_URL", server.uri()),
        ("RESULTS_SIZE", "2".to_string()),
        ("ID_LENGTH_CREATION", "12".to_string()),
    ]);
    let config = config_from_lookup(|name| env.get(name).cloned()).expect("Invalid config");
    let api = CrawlApi::from_config(&config).expect("Failed to build API");

    let id = api.start_crawl("match").expect("Failed to start crawl").id;
    assert_eq!(id.len(), 12);

    let results = wait_until_finished(&api, &id).await;
    assert_eq!(results.status, CrawlStatus::Done);
    assert_eq!(results.urls.len(), 2);
    assert!(results.urls.contains(&format!("{}/", server.uri())));
}

#[tokio::test]
async fn test_unreachable_link_fails_crawl_with_message() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[(
        BASE,
        "test <a href='/broken'>broken</a>",
    )]));
    let store = Arc::new(sumi_seek::InMemoryStore::new(8));
    let api = CrawlApi::new(
        coordinator(fetcher, store, 5),
        &Default::default(),
    );

    let id = api.start_crawl("test").expect("Failed to start crawl").id;
    let results = wait_until_finished(&api, &id).await;

    let expected = ScriptedFetcher::refused("https://example.com/broken");
    assert_eq!(results.status, CrawlStatus::Failed);
    assert_eq!(results.message, Some(expected.to_string()));
    assert_eq!(results.urls, vec![BASE.to_string()]);
}

#[tokio::test]
async fn test_identifier_collision_is_processing_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[(BASE, "test")]));
    let store = fixed_id_store("fixedid1");
    let existing = store.create(None).expect("Failed to seed record");
    store
        .add_url(&existing.id, "https://example.com/kept")
        .expect("Failed to seed url");

    let coordinator = coordinator(fetcher.clone(), store.clone(), 5);
    let result = coordinator.crawl("test");

    assert!(matches!(result, Err(SeekError::ProcessingFailed(_))));
    assert_eq!(store.len(), 1);

    let record = store.get("fixedid1").expect("Record vanished");
    assert_eq!(record.status, CrawlStatus::Active);
    assert_eq!(record.sorted_urls(), vec!["https://example.com/kept"]);
    assert_eq!(
        fetcher.calls.load(std::sync::atomic::Ordering::SeqCst),
        0,
        "no exploration should start"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_result_cap_holds_for_concurrent_crawls() {
    let links: String = (0..30).map(|i| format!("<a href='/p{}'>p</a>", i)).collect();
    let base_html = format!("match {}", links);
    let mut pages = vec![(BASE.to_string(), base_html)];
    for i in 0..30 {
        pages.push((format!("{}p{}", BASE, i), "match".to_string()));
    }
    let borrowed: Vec<(&str, &str)> = pages.iter().map(|(u, h)| (u.as_str(), h.as_str())).collect();

    let store = Arc::new(sumi_seek::InMemoryStore::new(8));
    let coordinator = coordinator(Arc::new(ScriptedFetcher::new(&borrowed)), store.clone(), 3);

    let mut crawls = Vec::new();
    for _ in 0..8 {
        crawls.push(coordinator.crawl_with_handle("match").expect("Failed to start crawl"));
    }
    for (id, handle) in crawls {
        handle.await.expect("Crawl task panicked");
        let record = store.get(&id).expect("Missing record");
        assert_eq!(record.status, CrawlStatus::Done);
        assert_eq!(record.urls.len(), 3, "crawl {} exceeded the cap", id);
    }
}
