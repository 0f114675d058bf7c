use crate::config::validation::{
    validate_check_interval, validate_max_concurrent, validate_memory_threshold,
    validate_page_timeout, validate_user_agent,
};
use crate::ConfigResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Digest file written when no output path is configured
pub const DEFAULT_OUTPUT_PATH: &str = "crawled_digest.md";

/// Default ceiling for simultaneous crawl sessions
pub const DEFAULT_MAX_CONCURRENT: i64 = 5;

/// Default per-page fetch/render timeout
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

/// Paragraphs with fewer words than this are dropped from extracted content
pub const DEFAULT_WORD_COUNT_THRESHOLD: usize = 10;

/// Memory usage (percent of total) at which the dispatcher stops adding sessions
pub const DEFAULT_MEMORY_THRESHOLD_PERCENT: f64 = 90.0;

/// How often the dispatcher re-samples memory while throttled
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 1000;

/// Contents of an optional TOML settings file
///
/// Every key is optional; anything left out falls back to the command line
/// or the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub crawler: CrawlerSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// `[crawler]` table of the settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerSettings {
    /// Which crawl engine renders pages
    pub engine: Option<EngineKind>,

    /// Maximum number of concurrent crawl sessions
    pub max_concurrent: Option<i64>,

    /// Run the browser without a visible window
    pub headless: Option<bool>,

    /// Verbose engine logging
    pub verbose: Option<bool>,

    /// Per-page timeout in seconds
    pub page_timeout_secs: Option<u64>,

    /// Minimum words for a paragraph to be kept (0 keeps everything)
    pub word_count_threshold: Option<usize>,

    /// User agent sent with every request
    pub user_agent: Option<String>,

    /// Memory usage percentage that pauses new sessions
    pub memory_threshold_percent: Option<f64>,

    /// Memory re-check interval in milliseconds
    pub check_interval_ms: Option<u64>,

    /// Cache behavior for page fetches (`bypass` unless set)
    pub cache_mode: Option<CacheMode>,

    /// Path to the Chrome/Chromium binary for the browser engine
    pub browser_executable: Option<PathBuf>,
}

/// `[output]` table of the settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputSettings {
    /// Path of the digest file
    pub path: Option<PathBuf>,

    /// Show the terminal progress monitor
    pub monitor: Option<bool>,
}

/// Crawl engine implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Render pages in a Chromium instance driven over the DevTools protocol
    #[default]
    Browser,
    /// Fetch pages with plain HTTP GET requests
    Http,
}

/// Whether the engine may serve pages from a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Use whatever caching the transport does by default
    Enabled,
    /// Always fetch fresh content
    #[default]
    Bypass,
}

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub verbose: bool,
    /// `None` keeps the engine's own default user agent
    pub user_agent: Option<String>,
    pub page_timeout: Duration,
    /// Chrome/Chromium binary; `None` searches the usual install locations
    pub executable: Option<PathBuf>,
}

/// Per-run crawl configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub cache_mode: CacheMode,
    pub verbose: bool,
    pub word_count_threshold: usize,
}

/// Parameters of the memory-adaptive dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Hard ceiling on simultaneous sessions
    pub max_session_permit: usize,
    /// Memory usage percentage at which new sessions are held back
    pub memory_threshold_percent: f64,
    /// Delay between memory samples while held back
    pub check_interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_session_permit: DEFAULT_MAX_CONCURRENT as usize,
            memory_threshold_percent: DEFAULT_MEMORY_THRESHOLD_PERCENT,
            check_interval: Duration::from_millis(DEFAULT_CHECK_INTERVAL_MS),
        }
    }
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub engine: Option<EngineKind>,
    pub headless: Option<bool>,
    pub verbose_crawl: bool,
    pub monitor: Option<bool>,
    pub max_concurrent: Option<i64>,
}

/// Fully resolved options for one digest run
#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub output_path: PathBuf,
    pub engine: EngineKind,
    pub monitor: bool,
    pub browser: BrowserConfig,
    pub run: RunConfig,
    pub dispatcher: DispatcherConfig,
}

impl DigestOptions {
    /// Merges the settings file with command-line overrides and validates
    /// the result
    ///
    /// Precedence is command line, then settings file, then built-in
    /// defaults.
    ///
    /// # Returns
    ///
    /// * `Ok(DigestOptions)` - Validated options
    /// * `Err(ConfigError::Validation)` - A value is out of range
    pub fn resolve(settings: &Settings, cli: &CliOverrides) -> ConfigResult<Self> {
        let crawler = &settings.crawler;

        let max_concurrent = validate_max_concurrent(
            cli.max_concurrent
                .or(crawler.max_concurrent)
                .unwrap_or(DEFAULT_MAX_CONCURRENT),
        )?;

        let memory_threshold_percent = crawler
            .memory_threshold_percent
            .unwrap_or(DEFAULT_MEMORY_THRESHOLD_PERCENT);
        validate_memory_threshold(memory_threshold_percent)?;

        let check_interval_ms = crawler
            .check_interval_ms
            .unwrap_or(DEFAULT_CHECK_INTERVAL_MS);
        validate_check_interval(check_interval_ms)?;

        let page_timeout_secs = crawler
            .page_timeout_secs
            .unwrap_or(DEFAULT_PAGE_TIMEOUT_SECS);
        validate_page_timeout(page_timeout_secs)?;

        if let Some(user_agent) = &crawler.user_agent {
            validate_user_agent(user_agent)?;
        }

        let verbose = cli.verbose_crawl || crawler.verbose.unwrap_or(false);

        Ok(Self {
            output_path: cli
                .output
                .clone()
                .or_else(|| settings.output.path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            engine: cli.engine.or(crawler.engine).unwrap_or_default(),
            monitor: cli.monitor.or(settings.output.monitor).unwrap_or(true),
            browser: BrowserConfig {
                headless: cli.headless.or(crawler.headless).unwrap_or(true),
                verbose,
                user_agent: crawler.user_agent.clone(),
                page_timeout: Duration::from_secs(page_timeout_secs),
                executable: crawler.browser_executable.clone(),
            },
            run: RunConfig {
                cache_mode: crawler.cache_mode.unwrap_or_default(),
                verbose,
                word_count_threshold: crawler
                    .word_count_threshold
                    .unwrap_or(DEFAULT_WORD_COUNT_THRESHOLD),
            },
            dispatcher: DispatcherConfig {
                max_session_permit: max_concurrent,
                memory_threshold_percent,
                check_interval: Duration::from_millis(check_interval_ms),
            },
        })
    }
}
