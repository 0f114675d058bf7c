//! Headless browser crawl engine
//!
//! Pages are rendered in one Chromium instance driven over the DevTools
//! protocol. Each URL gets its own tab; the browser is shut down once the
//! batch is done.

use crate::config::{BrowserConfig, CacheMode, RunConfig};
use crate::crawler::{crawl_tracked, CrawlContext, CrawlEngine, CrawlResult, PageBody};
use crate::EngineError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::network::SetCacheDisabledParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Crawl engine backed by a Chromium browser
pub struct BrowserEngine;

#[async_trait]
impl CrawlEngine for BrowserEngine {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn crawl_batch(
        &self,
        urls: &[String],
        ctx: &CrawlContext<'_>,
    ) -> Result<Vec<CrawlResult>, EngineError> {
        ctx.monitor.suspend(|| {
            tracing::info!(
                "Launching browser ({})",
                if ctx.browser.headless { "headless" } else { "headed" }
            )
        });
        let (mut browser, handler_task) = launch_browser(ctx.browser).await?;

        let results = {
            let browser = &browser;
            ctx.dispatcher
                .dispatch(urls.to_vec(), |url| async move {
                    let render = render_page(browser, &url, ctx.browser, ctx.run);
                    crawl_tracked(url.clone(), ctx, render).await
                })
                .await
        };

        if let Err(e) = browser.close().await {
            ctx.monitor
                .suspend(|| tracing::warn!("Failed to close browser cleanly: {}", e));
        }
        handler_task.abort();

        Ok(results)
    }
}

/// Extra Chromium command-line switches for `config`
fn launch_args(config: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];

    if let Some(user_agent) = &config.user_agent {
        args.push(format!("--user-agent={}", user_agent));
    }

    args
}

/// Builds the Chromium launch configuration
///
/// Without a configured executable, chromiumoxide searches the usual install
/// locations and fails with `EngineError::Launch` if there is none.
fn launch_config(config: &BrowserConfig) -> Result<LaunchConfig, EngineError> {
    let mut builder = LaunchConfig::builder()
        .no_sandbox()
        .request_timeout(config.page_timeout)
        .args(launch_args(config));

    if !config.headless {
        builder = builder.with_head();
    }

    if let Some(executable) = &config.executable {
        builder = builder.chrome_executable(executable);
    }

    builder.build().map_err(EngineError::Launch)
}

/// Launches Chromium and spawns the task that drives its event stream
///
/// A failure here is fatal for the whole run: nothing can be crawled without
/// a browser.
async fn launch_browser(config: &BrowserConfig) -> Result<(Browser, JoinHandle<()>), EngineError> {
    let launch = launch_config(config)?;

    let (browser, mut handler) = Browser::launch(launch)
        .await
        .map_err(|e| EngineError::Launch(e.to_string()))?;

    let verbose = config.verbose;
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                // Chromium emits CDP messages chromiumoxide can't decode; these are noise
                if verbose {
                    tracing::debug!("Browser handler error: {}", e);
                } else {
                    tracing::trace!("Browser handler error: {}", e);
                }
            }
        }
        tracing::debug!("Browser handler task completed");
    });

    match browser.version().await {
        Ok(version) => tracing::debug!("Connected to {}", version.product),
        Err(e) => {
            handler_task.abort();
            return Err(EngineError::Browser(format!(
                "browser is not responding: {}",
                e
            )));
        }
    }

    Ok((browser, handler_task))
}

/// Renders one URL in a fresh tab and returns the final HTML
async fn render_page(
    browser: &Browser,
    url: &str,
    config: &BrowserConfig,
    run: &RunConfig,
) -> Result<PageBody, String> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| format!("Failed to open tab: {}", e))?;

    let outcome = match tokio::time::timeout(config.page_timeout, navigate(&page, url, run)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(timeout_message(config.page_timeout)),
    };

    if let Err(e) = page.close().await {
        tracing::debug!("Failed to close tab for {}: {}", url, e);
    }

    outcome.map(PageBody::Html)
}

async fn navigate(page: &Page, url: &str, run: &RunConfig) -> Result<String, String> {
    if run.cache_mode == CacheMode::Bypass {
        page.execute(SetCacheDisabledParams::new(true))
            .await
            .map_err(|e| format!("Failed to disable cache: {}", e))?;
    }

    page.goto(url)
        .await
        .map_err(|e| format!("Navigation failed: {}", e))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| format!("Page load failed: {}", e))?;

    page.content()
        .await
        .map_err(|e| format!("Failed to read page content: {}", e))
}

fn timeout_message(timeout: Duration) -> String {
    format!("Page load timed out after {}s", timeout.as_secs())
}
