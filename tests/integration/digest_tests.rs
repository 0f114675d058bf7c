//! Full digest runs through the HTTP engine

use crate::common::{html_page, http_options, mount_html, mount_status, LONG_PARAGRAPH};
use std::fs;
use tempfile::tempdir;
use urlsdigest::config::CrawlerSettings;
use urlsdigest::crawler::{create_digest, HttpEngine};
use wiremock::MockServer;

#[tokio::test]
async fn test_digest_mixed_results_in_input_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/first", html_page("First", LONG_PARAGRAPH)).await;
    mount_status(&server, "/gone", 404).await;
    mount_html(&server, "/third", html_page("Third", LONG_PARAGRAPH)).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("digest.md");
    let urls = vec![
        format!("{}/first", base),
        format!("{}/gone", base),
        format!("{}/third", base),
    ];

    let report = create_digest(&urls, &http_options(&output, CrawlerSettings::default()), &HttpEngine)
        .await
        .unwrap();

    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.success, 2);
    assert_eq!(report.stats.failed, 1);
    let order: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(order, urls.iter().map(String::as_str).collect::<Vec<_>>());

    let digest = fs::read_to_string(&output).unwrap();
    assert!(digest.starts_with("---\ngenerated: "));
    assert!(digest.contains("total: 3\nsuccess: 2\nfailed: 1\n---\n"));
    assert!(digest.contains(&format!("## {}/gone\n\nError: HTTP 404 Not Found\n", base)));

    let first = digest.find(&format!("## {}/first", base)).unwrap();
    let gone = digest.find(&format!("## {}/gone", base)).unwrap();
    let third = digest.find(&format!("## {}/third", base)).unwrap();
    assert!(first < gone && gone < third);

    // Navigation chrome is stripped, content stays
    assert!(digest.contains("# First"));
    assert!(digest.contains(LONG_PARAGRAPH));
    assert!(!digest.contains("Home"));
}

#[tokio::test]
async fn test_word_count_threshold_applies() {
    let server = MockServer::start().await;
    mount_html(&server, "/short", html_page("Short", "Too short to keep.")).await;

    let dir = tempdir().unwrap();
    let urls = vec![format!("{}/short", server.uri())];

    let strict = dir.path().join("strict.md");
    create_digest(&urls, &http_options(&strict, CrawlerSettings::default()), &HttpEngine)
        .await
        .unwrap();
    assert!(!fs::read_to_string(&strict).unwrap().contains("Too short to keep."));

    let lenient = dir.path().join("lenient.md");
    let settings = CrawlerSettings {
        word_count_threshold: Some(0),
        ..Default::default()
    };
    create_digest(&urls, &http_options(&lenient, settings), &HttpEngine)
        .await
        .unwrap();
    assert!(fs::read_to_string(&lenient).unwrap().contains("Too short to keep."));
}

#[tokio::test]
async fn test_empty_page_gets_notice() {
    let server = MockServer::start().await;
    mount_html(&server, "/blank", "<html><body></body></html>".to_string()).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("digest.md");
    let url = format!("{}/blank", server.uri());

    let report = create_digest(
        &[url.clone()],
        &http_options(&output, CrawlerSettings::default()),
        &HttpEngine,
    )
    .await
    .unwrap();

    assert_eq!(report.stats.success, 1);
    let digest = fs::read_to_string(&output).unwrap();
    assert!(digest.contains(&format!(
        "*No markdown content found for this URL: {}*",
        url
    )));
}

#[tokio::test]
async fn test_single_session_still_crawls_everything() {
    let server = MockServer::start().await;
    for route in ["/a", "/b", "/c", "/d"] {
        mount_html(&server, route, html_page(route, LONG_PARAGRAPH)).await;
    }

    let dir = tempdir().unwrap();
    let output = dir.path().join("digest.md");
    let urls: Vec<String> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|route| format!("{}{}", server.uri(), route))
        .collect();
    let settings = CrawlerSettings {
        max_concurrent: Some(1),
        ..Default::default()
    };

    let report = create_digest(&urls, &http_options(&output, settings), &HttpEngine)
        .await
        .unwrap();

    assert_eq!(report.stats.total, 4);
    assert_eq!(report.stats.success, 4);
}

#[tokio::test]
async fn test_rerun_overwrites_digest() {
    let server = MockServer::start().await;
    mount_html(&server, "/page", html_page("Page", LONG_PARAGRAPH)).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("out").join("digest.md");
    let options = http_options(&output, CrawlerSettings::default());

    create_digest(&[format!("{}/page", server.uri())], &options, &HttpEngine)
        .await
        .unwrap();
    create_digest(&[format!("{}/other", server.uri())], &options, &HttpEngine)
        .await
        .unwrap();

    let digest = fs::read_to_string(&output).unwrap();
    assert!(digest.contains("total: 1\nsuccess: 0\nfailed: 1\n"));
    assert!(!digest.contains("/page"));
}
