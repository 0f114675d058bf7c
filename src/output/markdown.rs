//! Markdown digest generation
//!
//! The digest is a frontmatter block with the run counts followed by one
//! `## <url>` section per crawl result, in input order.

use crate::crawler::CrawlResult;
use crate::output::stats::DigestStats;
use crate::DigestError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Body prefix for successful results that produced no Markdown
pub const EMPTY_CONTENT_NOTICE: &str = "No markdown content found for this URL";

/// Writes the digest for `results` to `output_path`
///
/// Missing parent directories are created and an existing file is
/// overwritten.
///
/// # Arguments
///
/// * `results` - Crawl results, in input order
/// * `output_path` - Destination Markdown file
///
/// # Returns
///
/// * `Ok(DigestStats)` - Counts of the written digest
/// * `Err(DigestError::Write)` - The directory or file could not be written
pub fn write_digest(results: &[CrawlResult], output_path: &Path) -> Result<DigestStats, DigestError> {
    let write_error = |source| DigestError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(write_error)?;
            tracing::info!("Created directory: {}", parent.display());
        }
    }

    let digest = format_digest(results, Utc::now());
    fs::write(output_path, digest).map_err(write_error)?;

    tracing::debug!("Wrote digest to {}", output_path.display());

    Ok(DigestStats::from_results(results, output_path))
}

/// Formats crawl results as a digest document
///
/// # Arguments
///
/// * `results` - Crawl results, in input order
/// * `generated` - Timestamp recorded in the frontmatter
///
/// # Returns
///
/// The complete digest as a string
pub fn format_digest(results: &[CrawlResult], generated: DateTime<Utc>) -> String {
    let stats = DigestStats::from_results(results, Path::new(""));
    let mut md = String::new();

    md.push_str("---\n");
    md.push_str(&format!(
        "generated: {}\n",
        generated.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    md.push_str(&format!("total: {}\n", stats.total));
    md.push_str(&format!("success: {}\n", stats.success));
    md.push_str(&format!("failed: {}\n", stats.failed));
    md.push_str("---\n\n");

    for result in results {
        md.push_str(&format!("## {}\n\n", result.url));
        md.push_str(&section_body(result));
        md.push_str("\n\n");
    }

    md
}

fn section_body(result: &CrawlResult) -> String {
    if !result.success {
        let message = result.error_message.as_deref().unwrap_or("unknown error");
        return format!("Error: {}", message);
    }

    match result.markdown.as_deref().map(str::trim) {
        Some(markdown) if !markdown.is_empty() => markdown.to_string(),
        _ => format!("*{}: {}*", EMPTY_CONTENT_NOTICE, result.url),
    }
}
