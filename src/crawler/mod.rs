//! Crawler module for batch page fetching and content extraction
//!
//! This module contains the crawl side of a digest run:
//! - The [`CrawlEngine`] seam and its two implementations (headless browser
//!   and plain HTTP)
//! - The memory-adaptive dispatcher that bounds concurrent sessions
//! - The terminal progress monitor
//! - Readable-content extraction from rendered HTML
//! - Overall run coordination ([`create_digest`])

mod browser;
mod coordinator;
pub mod dispatcher;
mod fetcher;
mod monitor;
mod parser;

pub use browser::BrowserEngine;
pub use coordinator::{create_digest, DigestReport};
pub use dispatcher::{MemoryAdaptiveDispatcher, MemoryProbe, SystemMemory};
pub use fetcher::{build_http_client, fetch_page, HttpEngine};
pub use monitor::CrawlMonitor;
pub use parser::{extract_markdown, filter_short_paragraphs};

use crate::config::{BrowserConfig, EngineKind, RunConfig};
use crate::EngineError;
use async_trait::async_trait;
use std::future::Future;

/// Outcome of crawling a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// The URL as given in the input list
    pub url: String,

    /// Whether the page was fetched and extracted
    pub success: bool,

    /// Extracted Markdown (success only)
    pub markdown: Option<String>,

    /// Why the crawl failed (failure only)
    pub error_message: Option<String>,
}

impl CrawlResult {
    /// Creates a successful result
    pub fn success(url: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: true,
            markdown: Some(markdown.into()),
            error_message: None,
        }
    }

    /// Creates a failed result
    pub fn failure(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: false,
            markdown: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// Raw page content handed back by an engine before extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// HTML that still needs readable-content extraction
    Html(String),
    /// Plain text or Markdown, used as-is
    Text(String),
}

/// Everything an engine needs for one batch besides the URLs
pub struct CrawlContext<'a> {
    pub browser: &'a BrowserConfig,
    pub run: &'a RunConfig,
    pub dispatcher: &'a MemoryAdaptiveDispatcher,
    pub monitor: &'a CrawlMonitor,
}

/// A crawl engine turns a list of URLs into one result per URL
///
/// Implementations must return results in the same order as `urls` and must
/// report per-URL problems as failed [`CrawlResult`]s. An `Err` means the
/// engine as a whole could not run (for example the browser failed to start).
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// Short engine name for logs
    fn name(&self) -> &'static str;

    /// Crawls all `urls` under the given context
    async fn crawl_batch(
        &self,
        urls: &[String],
        ctx: &CrawlContext<'_>,
    ) -> Result<Vec<CrawlResult>, EngineError>;
}

/// Returns the engine implementation for `kind`
pub fn engine_for(kind: EngineKind) -> Box<dyn CrawlEngine> {
    match kind {
        EngineKind::Browser => Box::new(BrowserEngine),
        EngineKind::Http => Box::new(HttpEngine),
    }
}

/// Runs one page fetch and turns its outcome into a [`CrawlResult`]
///
/// Shared by the engines so that monitor updates, extraction and logging
/// behave identically whichever engine fetched the page.
pub(crate) async fn crawl_tracked<Fut>(url: String, ctx: &CrawlContext<'_>, fetch: Fut) -> CrawlResult
where
    Fut: Future<Output = Result<PageBody, String>>,
{
    ctx.monitor.url_started(&url);

    let result = match fetch.await {
        Ok(PageBody::Html(html)) => {
            let markdown = extract_markdown(&html, ctx.run.word_count_threshold);
            CrawlResult::success(url, markdown)
        }
        Ok(PageBody::Text(text)) => CrawlResult::success(url, text),
        Err(error) => CrawlResult::failure(url, error),
    };

    ctx.monitor.suspend(|| match &result.error_message {
        None if ctx.run.verbose => tracing::info!("Fetched {}", result.url),
        None => tracing::debug!("Fetched {}", result.url),
        Some(error) if ctx.run.verbose => tracing::warn!("Failed {}: {}", result.url, error),
        Some(error) => tracing::debug!("Failed {}: {}", result.url, error),
    });

    ctx.monitor.url_finished(&result);
    result
}
