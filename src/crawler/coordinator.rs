//! Digest run coordination
//!
//! This module wires one run together:
//! - Checking the inputs before any network activity
//! - Building the dispatcher and the progress monitor
//! - Issuing the single batched engine call
//! - Handing the ordered results to the digest writer

use crate::config::{validate_output_path, DigestOptions};
use crate::crawler::{CrawlContext, CrawlEngine, CrawlMonitor, CrawlResult, MemoryAdaptiveDispatcher};
use crate::output::{write_digest, DigestStats};
use crate::{ConfigError, DigestError, EngineError};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct DigestReport {
    /// One result per input URL, in input order
    pub results: Vec<CrawlResult>,

    /// Counts and output location of the written digest
    pub stats: DigestStats,
}

/// Runs a complete digest operation
///
/// 1. Reject an empty URL list or an unusable output path
/// 2. Build the memory-adaptive dispatcher and the monitor
/// 3. Crawl all URLs in one engine call
/// 4. Write the digest file
///
/// Per-URL failures end up in the digest. Only configuration, engine and
/// write errors are returned as `Err`, and in those cases no digest (or no
/// new digest) is written.
///
/// # Arguments
///
/// * `urls` - URLs to crawl, in output order
/// * `options` - Resolved run options
/// * `engine` - The crawl engine to use
///
/// # Example
///
/// ```no_run
/// use urlsdigest::config::{CliOverrides, DigestOptions, Settings};
/// use urlsdigest::crawler::{create_digest, engine_for};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = DigestOptions::resolve(&Settings::default(), &CliOverrides::default())?;
/// let urls = vec!["https://example.com".to_string()];
/// let engine = engine_for(options.engine);
/// let report = create_digest(&urls, &options, engine.as_ref()).await?;
/// println!("{} of {} succeeded", report.stats.success, report.stats.total);
/// # Ok(())
/// # }
/// ```
pub async fn create_digest(
    urls: &[String],
    options: &DigestOptions,
    engine: &dyn CrawlEngine,
) -> Result<DigestReport, DigestError> {
    if urls.is_empty() {
        return Err(ConfigError::NoUrls.into());
    }
    validate_output_path(&options.output_path)?;

    let dispatcher = MemoryAdaptiveDispatcher::new(options.dispatcher.clone());

    // Logged before the monitor starts drawing
    tracing::info!(
        "Starting crawl for {} URLs with the {} engine (max {} concurrent)",
        urls.len(),
        engine.name(),
        dispatcher.max_session_permit()
    );

    let monitor = CrawlMonitor::new(urls.len(), options.monitor);
    let ctx = CrawlContext {
        browser: &options.browser,
        run: &options.run,
        dispatcher: &dispatcher,
        monitor: &monitor,
    };

    let outcome = engine.crawl_batch(urls, &ctx).await;
    monitor.finish();
    let results = outcome?;

    if results.len() != urls.len() {
        return Err(EngineError::IncompleteBatch {
            expected: urls.len(),
            actual: results.len(),
        }
        .into());
    }

    let stats = write_digest(&results, &options.output_path)?;
    tracing::info!(
        "Crawl completed: {} succeeded, {} failed",
        stats.success,
        stats.failed
    );

    Ok(DigestReport { results, stats })
}
