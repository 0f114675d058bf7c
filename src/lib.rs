//! urlsdigest: crawl a list of URLs into one Markdown digest
//!
//! This crate fetches every URL in a list through a pluggable crawl engine,
//! extracts the readable content of each page as Markdown, and writes all of
//! it, in input order, into a single digest file with a summary frontmatter.

pub mod config;
pub mod crawler;
pub mod output;
pub mod urls;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for urlsdigest operations
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Failed to write digest to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
///
/// All of these are raised before any network activity starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No URLs specified. Provide URLs as arguments or via --urls-file.")]
    NoUrls,

    #[error("Could not read URL file {}: {source}", path.display())]
    UrlsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid output path {}: {reason}", path.display())]
    OutputPath { path: PathBuf, reason: String },
}

/// Errors that stop the crawl engine as a whole
///
/// Failures of individual URLs are never reported through this type; they
/// are recorded on the corresponding [`crawler::CrawlResult`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Engine returned {actual} results for {expected} URLs")]
    IncompleteBatch { expected: usize, actual: usize },
}

/// Result type alias for urlsdigest operations
pub type Result<T> = std::result::Result<T, DigestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{BrowserConfig, CacheMode, DigestOptions, EngineKind, RunConfig, Settings};
pub use crawler::{create_digest, CrawlEngine, CrawlResult};
pub use output::DigestStats;
pub use urls::resolve_urls;
