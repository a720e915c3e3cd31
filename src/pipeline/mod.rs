//! Scrape pipeline
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry and linear backoff
//! - HTML metadata extraction
//! - The bounded dispatch loop
//! - Input sources and overall run coordination

mod coordinator;
mod fetcher;
mod input;
mod parser;
mod scheduler;

pub use coordinator::{run_scrape, run_to_csv};
pub use fetcher::{build_http_client, is_success, FetchedPage, Fetcher, PageSource};
pub use input::{parse_url_line, urls_from_file, urls_from_list};
pub use parser::{extract_metadata, PageMetadata};
pub use scheduler::Scraper;

use crate::config::Config;
use crate::output::RunSummary;
use crate::ScrapeError;
use tokio::sync::mpsc;

/// Runs a complete scrape operation
///
/// This is the main entry point for a run. It will:
/// 1. Build the fetcher and scraper from the configuration
/// 2. Open the CSV output file
/// 3. Dispatch every URL from `urls`, at most `max_parallel` at a time
/// 4. Write one row per successfully scraped page
///
/// # Example
///
/// ```no_run
/// use url_meta_scraper::config::Config;
/// use url_meta_scraper::pipeline::{run, urls_from_list};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = urls_from_list(vec!["https://example.com/".to_string()]);
/// let summary = run(&Config::default(), urls).await?;
/// println!("{} rows written", summary.written);
/// # Ok(())
/// # }
/// ```
pub async fn run(config: &Config, urls: mpsc::Receiver<String>) -> Result<RunSummary, ScrapeError> {
    run_to_csv(config, urls).await
}
