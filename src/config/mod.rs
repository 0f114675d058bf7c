//! Configuration module for urlsdigest
//!
//! This module turns an optional TOML settings file and the command-line
//! overrides into the fully resolved, validated [`DigestOptions`] for a run:
//! the browser launch config, the per-run crawl config and the dispatcher
//! config.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use urlsdigest::config::{load_settings, CliOverrides, DigestOptions};
//!
//! let settings = load_settings(Path::new("urlsdigest.toml")).unwrap();
//! let options = DigestOptions::resolve(&settings, &CliOverrides::default()).unwrap();
//! println!("Max concurrent sessions: {}", options.dispatcher.max_session_permit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, CacheMode, CliOverrides, CrawlerSettings, DigestOptions, DispatcherConfig,
    EngineKind, OutputSettings, RunConfig, Settings, DEFAULT_CHECK_INTERVAL_MS,
    DEFAULT_MAX_CONCURRENT, DEFAULT_MEMORY_THRESHOLD_PERCENT, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_TIMEOUT_SECS, DEFAULT_WORD_COUNT_THRESHOLD,
};

// Re-export parser and validation functions
pub use parser::load_settings;
pub use validation::{validate_max_concurrent, validate_output_path};
