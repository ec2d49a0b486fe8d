//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including what lands on disk.

use html_scraper::config::{Config, ConfigOverrides};
use html_scraper::crawler::Coordinator;
use html_scraper::output::CrawlStatistics;
use html_scraper::state::CrawlState;
use html_scraper::storage::FsStorage;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at `root_url`
fn create_test_config(
    root_url: &str,
    max_depth: u32,
    max_width: Option<usize>,
    unique: bool,
    output_dir: &Path,
) -> Config {
    ConfigOverrides {
        root_url: Some(root_url.to_string()),
        max_depth: Some(max_depth),
        max_width,
        unique_urls_only: unique,
        output_dir: Some(output_dir.to_path_buf()),
        ..Default::default()
    }
    .into_config()
    .expect("valid test config")
}

/// Builds an HTML page linking to each of `hrefs`
fn html_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

/// Mounts a GET handler returning an HTML page with the given links
async fn mount_page(server: &MockServer, page_path: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(hrefs))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Counts requests the mock server received for a path
async fn request_count(server: &MockServer, page_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == page_path)
        .count()
}

/// Counts files written for a depth
fn files_at_depth(output_dir: &Path, depth: u32) -> usize {
    match std::fs::read_dir(output_dir.join(depth.to_string())) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

async fn run(config: Config) -> CrawlStatistics {
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");
    assert_eq!(coordinator.state(), CrawlState::Done);
    stats
}

fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_width_caps_children_per_page() {
    // Root links to three pages; only the first two are followed
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/a", "/b", "/c"]).await;
    for page in ["/a", "/b", "/c"] {
        mount_page(&server, page, &["/deeper"]).await;
    }
    mount_page(&server, "/deeper", &[]).await;

    let stats = run(create_test_config(&root, 1, Some(2), false, output.path())).await;

    assert_eq!(request_count(&server, "/").await, 1);
    assert_eq!(request_count(&server, "/a").await, 1);
    assert_eq!(request_count(&server, "/b").await, 1);
    assert_eq!(request_count(&server, "/c").await, 0);
    assert_eq!(request_count(&server, "/deeper").await, 0);

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.fetches_failed, 0);
    assert_eq!(stats.files_written, 3);
    assert_eq!(stats.writes_failed, 0);
    assert_eq!(stats.levels_completed, 2);

    assert_eq!(files_at_depth(output.path(), 0), 1);
    assert_eq!(files_at_depth(output.path(), 1), 2);
    assert_eq!(files_at_depth(output.path(), 2), 0);
}

#[tokio::test]
async fn test_unreachable_root_ends_crawl() {
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("pages");

    let stats = run(create_test_config(
        &unused_local_url(),
        3,
        None,
        false,
        &out_dir,
    ))
    .await;

    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.fetches_failed, 1);
    assert_eq!(stats.files_written, 0);
    assert_eq!(stats.writes_failed, 0);
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_unique_urls_fetched_once() {
    // Both depth-1 pages link to /x; /p1 also links back to the root
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/p1", "/p2"]).await;
    mount_page(&server, "/p1", &["/x", "/"]).await;
    mount_page(&server, "/p2", &["/x"]).await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&["/y"])))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/y", &[]).await;

    let mut coordinator =
        Coordinator::new(create_test_config(&root, 2, None, true, output.path())).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(request_count(&server, "/").await, 1);
    assert_eq!(request_count(&server, "/x").await, 1);
    assert_eq!(request_count(&server, "/y").await, 0);
    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(files_at_depth(output.path(), 2), 1);
    // root, /p1, /p2, /x
    assert_eq!(coordinator.visited_count(), 4);

    server.verify().await;
}

#[tokio::test]
async fn test_unique_width_applies_after_filtering() {
    // /s1 is taken by /p1 first, so /p2 skips it and still contributes two new children
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/p1"]).await;
    mount_page(&server, "/p1", &["/p2", "/s1", "/s2"]).await;
    mount_page(&server, "/p2", &["/s1", "/s2", "/t1", "/t2", "/t3"]).await;
    for page in ["/s1", "/s2", "/t1", "/t2", "/t3"] {
        mount_page(&server, page, &[]).await;
    }

    // Depth 1: /p1. Depth 2: /p2, /s1 (width 2). Depth 3 from /p2: /s2, /t1.
    let stats = run(create_test_config(&root, 3, Some(2), true, output.path())).await;

    assert_eq!(request_count(&server, "/p2").await, 1);
    assert_eq!(request_count(&server, "/s1").await, 1);
    assert_eq!(request_count(&server, "/s2").await, 1);
    assert_eq!(request_count(&server, "/t1").await, 1);
    assert_eq!(request_count(&server, "/t2").await, 0);
    assert_eq!(request_count(&server, "/t3").await, 0);
    assert_eq!(stats.pages_fetched, 6);
}

#[tokio::test]
async fn test_without_uniqueness_urls_refetched_at_later_depths() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/a"]).await;
    mount_page(&server, "/a", &["/"]).await;

    let stats = run(create_test_config(&root, 2, None, false, output.path())).await;

    assert_eq!(request_count(&server, "/").await, 2);
    assert_eq!(request_count(&server, "/a").await, 1);
    assert_eq!(stats.pages_fetched, 3);

    let storage = FsStorage::new(output.path());
    assert!(storage.storage_path(&root, 0).exists());
    assert!(storage.storage_path(&root, 2).exists());
}

#[tokio::test]
async fn test_write_failure_does_not_block_traversal() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/a"]).await;
    mount_page(&server, "/a", &[]).await;

    // A regular file where the output directory should be makes every write fail
    let blocker = output.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let stats = run(create_test_config(&root, 1, None, false, &blocker)).await;

    assert_eq!(request_count(&server, "/a").await, 1);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.files_written, 0);
    assert_eq!(stats.writes_failed, 2);
}

#[tokio::test]
async fn test_written_file_matches_response_bytes() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());
    let body: Vec<u8> = b"<html><body>\xff\xfe raw \x00 bytes</body></html>".to_vec();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let stats = run(create_test_config(&root, 0, None, false, output.path())).await;
    assert_eq!(stats.files_written, 1);

    let written = std::fs::read(FsStorage::new(output.path()).storage_path(&root, 0)).unwrap();
    assert_eq!(written, body);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_root() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/a", "/b"]).await;
    mount_page(&server, "/a", &[]).await;
    mount_page(&server, "/b", &[]).await;

    let stats = run(create_test_config(&root, 0, None, true, output.path())).await;

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.levels_completed, 1);
}

#[tokio::test]
async fn test_failed_child_does_not_abort_siblings() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());
    let dead = unused_local_url();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[&dead, "/ok"])))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", &[]).await;

    let stats = run(create_test_config(&root, 1, None, false, output.path())).await;

    assert_eq!(request_count(&server, "/ok").await, 1);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.fetches_failed, 1);
    assert_eq!(stats.files_written, 2);
}

#[tokio::test]
async fn test_bounded_concurrency_fetches_everything() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/a", "/b", "/c", "/d"]).await;
    for page in ["/a", "/b", "/c", "/d"] {
        mount_page(&server, page, &[]).await;
    }

    let mut config = create_test_config(&root, 1, None, false, output.path());
    config.crawler.max_concurrent_fetches = Some(1);

    let stats = run(config).await;
    assert_eq!(stats.pages_fetched, 5);
    assert_eq!(files_at_depth(output.path(), 1), 4);
}

#[tokio::test]
async fn test_shutdown_keeps_completed_writes() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let root = format!("{}/", server.uri());

    mount_page(&server, "/", &["/slow"]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(&[]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(create_test_config(&root, 2, None, false, output.path())).unwrap();
    let stats = coordinator
        .run_until(tokio::time::sleep(Duration::from_millis(500)))
        .await
        .unwrap();

    assert!(stats.interrupted);
    assert_eq!(stats.levels_completed, 1);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.files_written, 1);
    assert!(stats.elapsed < Duration::from_secs(5));
    assert_eq!(coordinator.state(), CrawlState::Done);
    assert!(FsStorage::new(output.path()).storage_path(&root, 0).exists());
}
