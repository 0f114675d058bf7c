//! Terminal progress monitor
//!
//! Purely observational: the monitor never influences which URLs are crawled
//! or how their results are recorded.

use crate::crawler::CrawlResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// Live progress display for one crawl batch
pub struct CrawlMonitor {
    bar: ProgressBar,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    active: AtomicUsize,
}

impl CrawlMonitor {
    /// Creates a monitor for `total` URLs; a disabled monitor draws nothing
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar.enable_steady_tick(REFRESH_INTERVAL);
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
        }
    }

    /// Returns true if the monitor draws to the terminal
    pub fn is_enabled(&self) -> bool {
        !self.bar.is_hidden()
    }

    /// Records that a session started on `url`
    pub fn url_started(&self, url: &str) {
        self.active.fetch_add(1, Ordering::SeqCst);
        self.refresh(url);
    }

    /// Records a finished URL
    pub fn url_finished(&self, result: &CrawlResult) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        if result.success {
            self.succeeded.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.bar.inc(1);
        self.refresh(&result.url);
    }

    /// Runs `f` with the bar cleared and redraws it afterwards
    ///
    /// Log lines emitted inside `f` land above the bar instead of tearing it.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Clears the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn refresh(&self, url: &str) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar.set_message(format!(
            "ok {} | failed {} | active {} | {}",
            self.succeeded(),
            self.failed(),
            self.active(),
            url
        ));
    }
}
