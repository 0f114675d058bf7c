//! HTTP crawl engine
//!
//! This module handles plain HTTP fetching for the `http` engine, including:
//! - Building the HTTP client with user agent, timeouts and cache headers
//! - GET requests for page content
//! - Content-Type classification (HTML, plain text, unsupported)
//! - Error classification into per-URL failure messages

use crate::config::{BrowserConfig, CacheMode, RunConfig};
use crate::crawler::{crawl_tracked, CrawlContext, CrawlEngine, CrawlResult, PageBody};
use crate::EngineError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Crawl engine that fetches pages with HTTP GET requests
///
/// No JavaScript runs, so pages that render client-side come back with
/// whatever the server sent.
pub struct HttpEngine;

#[async_trait]
impl CrawlEngine for HttpEngine {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn crawl_batch(
        &self,
        urls: &[String],
        ctx: &CrawlContext<'_>,
    ) -> Result<Vec<CrawlResult>, EngineError> {
        let client = build_http_client(ctx.browser, ctx.run)?;
        let client = &client;

        let results = ctx
            .dispatcher
            .dispatch(urls.to_vec(), |url| async move {
                let fetch = fetch_page(client, &url);
                crawl_tracked(url.clone(), ctx, fetch).await
            })
            .await;

        Ok(results)
    }
}

/// Returns the user agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("urlsdigest/{}", env!("CARGO_PKG_VERSION"))
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Browser config (user agent and page timeout)
/// * `run` - Run config (cache mode)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &BrowserConfig, run: &RunConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);

    let mut headers = HeaderMap::new();
    if run.cache_mode == CacheMode::Bypass {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(config.page_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(config.page_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL and classifies the response
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx, HTML or no Content-Type | `PageBody::Html` |
/// | 2xx, `text/plain` or `text/markdown` | `PageBody::Text` |
/// | 2xx, anything else | `Err("unsupported content type: ...")` |
/// | Non-2xx status | `Err("HTTP 404 Not Found")` etc. |
/// | Timeout | `Err("Request timeout")` |
/// | Connection failure | `Err("Connection failed: ...")` |
///
/// Failures are never retried.
pub async fn fetch_page(client: &Client, url: &str) -> Result<PageBody, String> {
    let response = client.get(url).send().await.map_err(|e| classify_error(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let kind = classify_content_type(&content_type)?;

    let body = response.text().await.map_err(|e| classify_error(&e))?;

    Ok(match kind {
        BodyKind::Html => PageBody::Html(body),
        BodyKind::Text => PageBody::Text(body),
    })
}

enum BodyKind {
    Html,
    Text,
}

fn classify_content_type(content_type: &str) -> Result<BodyKind, String> {
    let mime = content_type.split(';').next().unwrap_or("").trim();

    match mime {
        "" | "text/html" | "application/xhtml+xml" => Ok(BodyKind::Html),
        "text/plain" | "text/markdown" | "text/x-markdown" => Ok(BodyKind::Text),
        other => Err(format!("unsupported content type: {}", other)),
    }
}

fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
