//! HTTP engine request/response behavior against a mock server

use crate::common::{html_page, mount_html, mount_status, LONG_PARAGRAPH};
use std::time::Duration;
use urlsdigest::crawler::{build_http_client, fetch_page, PageBody};
use urlsdigest::{BrowserConfig, CacheMode, RunConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn browser_config(timeout: Duration) -> BrowserConfig {
    BrowserConfig {
        headless: true,
        verbose: false,
        user_agent: Some("TestDigest/1.0".to_string()),
        executable: None,
        page_timeout: timeout,
    }
}

fn run_config() -> RunConfig {
    RunConfig {
        cache_mode: CacheMode::Bypass,
        verbose: false,
        word_count_threshold: 0,
    }
}

fn client() -> reqwest::Client {
    build_http_client(&browser_config(Duration::from_secs(5)), &run_config()).unwrap()
}

#[tokio::test]
async fn test_fetch_html_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/article", html_page("Article", LONG_PARAGRAPH)).await;

    let body = fetch_page(&client(), &format!("{}/article", server.uri()))
        .await
        .unwrap();

    match body {
        PageBody::Html(html) => assert!(html.contains(LONG_PARAGRAPH)),
        other => panic!("expected HTML, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("plain notes")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let body = fetch_page(&client(), &format!("{}/notes.txt", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, PageBody::Text("plain notes".to_string()));
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    mount_status(&server, "/broken", 500).await;

    let error = fetch_page(&client(), &format!("{}/broken", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(error, "HTTP 500 Internal Server Error");
}

#[tokio::test]
async fn test_not_found_is_reported_with_status() {
    let server = MockServer::start().await;

    let error = fetch_page(&client(), &format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(error, "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let error = fetch_page(&client(), &format!("{}/report.pdf", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(error, "unsupported content type: application/pdf");
}

#[tokio::test]
async fn test_requests_bypass_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fresh"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .and(header("user-agent", "TestDigest/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>fresh</p>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = fetch_page(&client(), &format!("{}/fresh", server.uri())).await;
    assert!(body.is_ok());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = build_http_client(&browser_config(Duration::from_secs(1)), &run_config()).unwrap();
    let error = fetch_page(&client, &format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(error, "Request timeout");
}

#[tokio::test]
async fn test_connection_refused() {
    let error = fetch_page(&client(), "http://127.0.0.1:1/").await.unwrap_err();
    assert!(error.starts_with("Connection failed"), "got: {}", error);
}

#[tokio::test]
async fn test_enabled_cache_mode_sends_no_cache_headers() {
    let server = MockServer::start().await;
    // Mounted first, so it wins whenever the bypass header is present
    Mock::given(method("GET"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>cached</p>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let run = RunConfig {
        cache_mode: CacheMode::Enabled,
        ..run_config()
    };
    let client = build_http_client(&browser_config(Duration::from_secs(5)), &run).unwrap();

    let body = fetch_page(&client, &format!("{}/cached", server.uri())).await;
    assert!(body.is_ok(), "got: {:?}", body);
}
