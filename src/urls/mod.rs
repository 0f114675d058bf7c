//! URL source resolution
//!
//! This module collects the URLs to crawl from a URL file and from the
//! command line into one ordered list. URLs from the file come first, in file
//! order, followed by the command-line URLs in argument order. Nothing is
//! deduplicated and URL syntax is not checked; a malformed URL simply fails
//! at crawl time and is reported in the digest.

use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Returns true if a line carries no URL (blank or `#` comment)
fn is_ignored_line(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Parses the contents of a URL file
///
/// Each line is trimmed. Empty lines and lines whose first non-whitespace
/// character is `#` are skipped.
///
/// # Example
///
/// ```
/// use urlsdigest::urls::parse_url_list;
///
/// let urls = parse_url_list("# docs\nhttps://a.test\n\n  https://b.test  \n");
/// assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
/// ```
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !is_ignored_line(line))
        .map(str::to_string)
        .collect()
}

/// Reads a URL file from disk
///
/// # Returns
///
/// * `Ok(Vec<String>)` - URLs in file order (possibly empty)
/// * `Err(ConfigError::UrlsFile)` - The file is missing or unreadable
pub fn read_urls_file(path: &Path) -> ConfigResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::UrlsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let urls = parse_url_list(&content);
    if urls.is_empty() {
        tracing::warn!(
            "URL file '{}' is empty or only contains comments",
            path.display()
        );
    } else {
        tracing::debug!("Read {} URLs from {}", urls.len(), path.display());
    }

    Ok(urls)
}

/// Builds the ordered list of URLs to crawl
///
/// # Arguments
///
/// * `cli_urls` - URLs given as positional arguments
/// * `urls_file` - Optional path to a file of newline-delimited URLs
///
/// # Returns
///
/// * `Ok(Vec<String>)` - File URLs followed by CLI URLs
/// * `Err(ConfigError::NoUrls)` - Neither source produced a URL
/// * `Err(ConfigError::UrlsFile)` - The URL file could not be read
pub fn resolve_urls(cli_urls: &[String], urls_file: Option<&Path>) -> ConfigResult<Vec<String>> {
    let mut urls = match urls_file {
        Some(path) => read_urls_file(path)?,
        None => Vec::new(),
    };

    urls.extend(
        cli_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string),
    );

    if urls.is_empty() {
        return Err(ConfigError::NoUrls);
    }

    Ok(urls)
}
