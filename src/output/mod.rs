//! Output module for the digest file and the terminal report
//!
//! This module handles:
//! - Rendering crawl results as one Markdown digest with frontmatter
//! - Writing the digest to disk
//! - Printing per-URL results and the final summary

mod markdown;
pub mod stats;

pub use markdown::{format_digest, write_digest, EMPTY_CONTENT_NOTICE};
pub use stats::{print_results, print_summary, DigestStats};
