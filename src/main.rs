//! urlsdigest main entry point
//!
//! This is the command-line interface for crawling a list of URLs into a
//! single Markdown digest.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use urlsdigest::config::{
    load_settings, validate_output_path, CliOverrides, DigestOptions, EngineKind, Settings,
};
use urlsdigest::crawler::{create_digest, engine_for};
use urlsdigest::output::{print_results, print_summary};
use urlsdigest::resolve_urls;

/// urlsdigest: crawl URLs into one Markdown digest
///
/// Every URL is fetched (by default in a headless browser), its readable
/// content is extracted as Markdown, and all pages are written in input
/// order into a single file with a summary frontmatter.
#[derive(Parser, Debug)]
#[command(name = "urlsdigest")]
#[command(version)]
#[command(about = "Crawl a list of URLs into a single Markdown digest", long_about = None)]
struct Cli {
    /// URLs to crawl
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// File with one URL per line (lines starting with # are ignored)
    #[arg(long, value_name = "FILE")]
    urls_file: Option<PathBuf>,

    /// Output file for the Markdown digest [default: crawled_digest.md]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Run the browser in headless mode (default)
    #[arg(long, overrides_with = "no_headless")]
    headless: bool,

    /// Show the browser window while crawling
    #[arg(long, overrides_with = "headless")]
    no_headless: bool,

    /// Enable verbose logging from the crawl engine
    #[arg(long)]
    verbose_crawl: bool,

    /// Show the live crawl monitor in the terminal (default)
    #[arg(long, overrides_with = "no_monitor")]
    monitor: bool,

    /// Print one line per URL after the crawl instead of the live monitor
    #[arg(long, overrides_with = "monitor")]
    no_monitor: bool,

    /// Maximum number of concurrent crawl sessions [default: 5]
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_concurrent: Option<i64>,

    /// Crawl engine [default: browser]
    #[arg(long, value_enum)]
    engine: Option<EngineKind>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output: self.output.clone(),
            engine: self.engine,
            headless: flag_pair(self.headless, self.no_headless),
            verbose_crawl: self.verbose_crawl,
            monitor: flag_pair(self.monitor, self.no_monitor),
            max_concurrent: self.max_concurrent,
        }
    }
}

/// Collapses a `--x` / `--no-x` pair into an override
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (_, true) => Some(false),
        (true, false) => Some(true),
        (false, false) => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, cli.verbose_crawl);

    // Load and validate configuration
    let settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_settings(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Settings::default(),
    };
    let options = DigestOptions::resolve(&settings, &cli.overrides())?;

    let urls = resolve_urls(&cli.urls, cli.urls_file.as_deref())?;
    validate_output_path(&options.output_path)?;

    tracing::info!(
        "Collected {} URLs, writing digest to {}",
        urls.len(),
        options.output_path.display()
    );

    let engine = engine_for(options.engine);
    let report = create_digest(&urls, &options, engine.as_ref()).await?;

    if options.monitor {
        println!("\nProcessing {} results...", report.results.len());
    } else {
        print_results(&report.results);
    }
    print_summary(&report.stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout only carries the run report.
fn setup_logging(verbose: u8, quiet: bool, verbose_crawl: bool) {
    let mut directives = if quiet {
        // Only show errors
        "error".to_string()
    } else {
        match verbose {
            0 => "urlsdigest=info,warn".to_string(),
            1 => "urlsdigest=debug,info".to_string(),
            2 => "urlsdigest=trace,debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    if verbose_crawl && !quiet && verbose < 2 {
        directives.push_str(",urlsdigest::crawler=debug,chromiumoxide=info");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
