//! url-meta-scraper main entry point
//!
//! This is the command-line interface for the page metadata scraper.

use clap::Parser;
use std::path::PathBuf;
use url_meta_scraper::config::{load_config, validate, Config};
use url_meta_scraper::pipeline::{run, urls_from_file, urls_from_list};
use tracing_subscriber::EnvFilter;

/// url-meta-scraper: fetches pages and records their title and description
///
/// Every URL is fetched with a per-request timeout and retried with linear
/// backoff. Pages that load produce one CSV row
/// (date, url, status code, title, description); pages that keep failing are
/// logged and left out. Rows appear in completion order.
#[derive(Parser, Debug)]
#[command(name = "url-meta-scraper")]
#[command(version)]
#[command(about = "Fetches pages and records their title and meta description", long_about = None)]
struct Cli {
    /// URLs to scrape
    #[arg(value_name = "URL", conflicts_with = "input")]
    urls: Vec<String>,

    /// Read URLs from a file, one per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout, e.g. "10s" or "1m30s"
    #[arg(long, env = "TIMEOUT")]
    timeout: Option<String>,

    /// Fetch attempts per URL
    #[arg(long, env = "RETRY_COUNT")]
    retry_count: Option<u32>,

    /// Maximum number of concurrent requests
    #[arg(short = 'p', long = "parallel", env = "PARALLEL_REQ_COUNT")]
    max_parallel: Option<usize>,

    /// Delay unit for retry backoff, e.g. "1s"
    #[arg(long, env = "BACKOFF_UNIT")]
    backoff_unit: Option<String>,

    /// CSV file to write results to
    #[arg(short, long = "output", value_name = "FILE", env = "CSV_FILENAME")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line and environment overrides on top of `config`
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(timeout) = &self.timeout {
            config.scraper.timeout = timeout.clone();
        }
        if let Some(retry_count) = self.retry_count {
            config.scraper.retry_count = retry_count;
        }
        if let Some(max_parallel) = self.max_parallel {
            config.scraper.max_parallel = max_parallel;
        }
        if let Some(backoff_unit) = &self.backoff_unit {
            config.scraper.backoff_unit = backoff_unit.clone();
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Starting url-meta-scraper");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&cli, &config);
    } else {
        handle_scrape(&cli, &config).await?;
    }

    tracing::info!("Finished");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("url_meta_scraper=info,warn"),
            1 => EnvFilter::new("url_meta_scraper=debug,info"),
            2 => EnvFilter::new("url_meta_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and input
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== url-meta-scraper Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Timeout: {}", config.scraper.timeout);
    println!("  Retry count: {}", config.scraper.retry_count);
    println!("  Max parallel requests: {}", config.scraper.max_parallel);
    println!("  Backoff unit: {}", config.scraper.backoff_unit);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    match &cli.input {
        Some(path) => println!("\nInput: URLs from {}", path.display()),
        None => {
            println!("\nInput ({} URLs):", cli.urls.len());
            for url in &cli.urls {
                println!("  - {}", url);
            }
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let urls = match &cli.input {
        Some(path) => {
            tracing::info!("Reading URLs from {}", path.display());
            urls_from_file(path).await?
        }
        None => {
            if cli.urls.is_empty() {
                tracing::warn!("No URLs given; the output will be empty");
            }
            urls_from_list(cli.urls.clone())
        }
    };

    match run(config, urls).await {
        Ok(summary) => {
            tracing::info!(
                "Wrote {} rows to {} ({} URLs dropped)",
                summary.written,
                config.output.csv_path,
                summary.dropped()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
