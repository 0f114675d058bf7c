//! Run statistics and terminal reporting
//!
//! This module counts the outcome of a digest run and prints the
//! human-readable report to stdout.

use crate::crawler::CrawlResult;
use crate::output::markdown::EMPTY_CONTENT_NOTICE;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Counts of a written digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestStats {
    /// Number of URLs crawled
    pub total: usize,

    /// URLs fetched and extracted
    pub success: usize,

    /// URLs that failed
    pub failed: usize,

    /// Where the digest was written
    pub output_path: PathBuf,
}

impl DigestStats {
    /// Counts the outcomes in `results`
    pub fn from_results(results: &[CrawlResult], output_path: &Path) -> Self {
        let success = results.iter().filter(|r| r.success).count();

        Self {
            total: results.len(),
            success,
            failed: results.len() - success,
            output_path: output_path.to_path_buf(),
        }
    }
}

/// Prints one colored line per result, in input order
///
/// Used when the live monitor is disabled.
pub fn print_results(results: &[CrawlResult]) {
    for result in results {
        if result.success {
            println!("{}", format!("[SUCCESS] Fetched: {}", result.url).green());
            let empty = result
                .markdown
                .as_deref()
                .map_or(true, |md| md.trim().is_empty());
            if empty {
                println!(
                    "{}",
                    format!("  [WARNING] {}: {}", EMPTY_CONTENT_NOTICE, result.url).yellow()
                );
            }
        } else {
            println!("{}", format!("[FAILED]  URL: {}", result.url).red());
            println!(
                "{}",
                format!(
                    "  Error: {}",
                    result.error_message.as_deref().unwrap_or("unknown error")
                )
                .red()
            );
        }
    }
}

/// Prints the final summary of a digest run
///
/// # Arguments
///
/// * `stats` - Counts of the written digest
pub fn print_summary(stats: &DigestStats) {
    let location = std::path::absolute(&stats.output_path).unwrap_or_else(|_| stats.output_path.clone());

    println!();
    println!(
        "{}",
        format!("Successfully created digest: {}", location.display()).green()
    );
    println!("Total URLs processed: {}", stats.total);
    println!("Successful crawls: {}", stats.success);

    let failed = format!("Failed crawls: {}", stats.failed);
    if stats.failed > 0 {
        println!("{}", failed.red());
    } else {
        println!("{}", failed);
    }
}
