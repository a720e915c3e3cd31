//! Bounded dispatch loop for the scrape pipeline
//!
//! This module handles:
//! - Consuming URLs from an input channel in FIFO order
//! - Capping in-flight fetch tasks at `max_parallel`
//! - Funnelling records from concurrent tasks into one output channel
//! - Draining outstanding tasks before closing the output
//!
//! Output records arrive in completion order. There is no guarantee that
//! they match input order.

use crate::config::ScraperConfig;
use crate::pipeline::fetcher::{Fetcher, PageSource};
use crate::pipeline::parser::extract_metadata;
use crate::record::ResultRecord;
use crate::ScrapeError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

/// Admission-controlled scraper
///
/// Each call to [`Scraper::run`] or [`Scraper::scrape`] owns its own set of
/// in-flight tasks; nothing is shared between runs.
pub struct Scraper<S = Fetcher> {
    source: Arc<S>,
    max_parallel: usize,
}

impl<S> Clone for Scraper<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            max_parallel: self.max_parallel,
        }
    }
}

impl Scraper<Fetcher> {
    /// Creates a scraper backed by the HTTP fetcher
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout as a duration string
    /// * `retry_count` - Number of fetch attempts per URL
    /// * `max_parallel` - Maximum number of concurrent fetches
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to scrape
    /// * `Err(ScrapeError::InvalidConfig)` - Malformed timeout or zero parallelism
    pub fn new(timeout: &str, retry_count: u32, max_parallel: usize) -> Result<Self, ScrapeError> {
        Self::with_source(Fetcher::new(timeout, retry_count)?, max_parallel)
    }

    /// Creates a scraper from the `[scraper]` configuration section
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Self::with_source(Fetcher::from_config(config)?, config.max_parallel)
    }
}

impl<S: PageSource + 'static> Scraper<S> {
    /// Creates a scraper over any page source
    pub fn with_source(source: S, max_parallel: usize) -> Result<Self, ScrapeError> {
        if max_parallel == 0 {
            return Err(ScrapeError::InvalidConfig(
                "max_parallel must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            source: Arc::new(source),
            max_parallel,
        })
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Starts scraping in the background and returns the record channel
    ///
    /// The returned channel closes once the input is exhausted and every
    /// dispatched task has finished. Must be called within a tokio runtime.
    pub fn scrape(&self, urls: mpsc::Receiver<String>) -> mpsc::Receiver<ResultRecord> {
        let (tx, rx) = mpsc::channel(self.max_parallel);
        let scraper = self.clone();

        tokio::spawn(async move {
            scraper.run(urls, tx).await;
        });

        rx
    }

    /// Runs the dispatch loop until input is exhausted and all tasks drain
    ///
    /// # Loop
    ///
    /// 1. With `max_parallel` tasks in flight, wait for one to finish and
    ///    consume no input.
    /// 2. Otherwise take the next URL; stop dispatching once input closes.
    /// 3. Spawn a task that fetches the URL, extracts metadata, and sends a
    ///    record on success. Failures send nothing.
    ///
    /// After dispatch stops, every remaining task is awaited. `out` is
    /// dropped on return, which closes the output once the tasks' clones are
    /// gone too.
    ///
    /// # Returns
    ///
    /// The number of URLs dispatched
    pub async fn run(
        &self,
        mut urls: mpsc::Receiver<String>,
        out: mpsc::Sender<ResultRecord>,
    ) -> usize {
        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut dispatched = 0;

        loop {
            if in_flight.len() >= self.max_parallel {
                tracing::info!(
                    "Waiting for a request to finish ({} in flight)",
                    in_flight.len()
                );
                if let Some(joined) = in_flight.join_next().await {
                    settle(joined);
                }
                continue;
            }

            let Some(url) = urls.recv().await else {
                break;
            };

            tracing::info!("Scraping {}", url);
            dispatched += 1;

            let source = Arc::clone(&self.source);
            let out = out.clone();
            in_flight.spawn(async move {
                scrape_url(source.as_ref(), url, &out).await;
            });
        }

        if !in_flight.is_empty() {
            tracing::debug!("Input exhausted, draining {} requests", in_flight.len());
        }
        while let Some(joined) = in_flight.join_next().await {
            settle(joined);
        }

        tracing::debug!("All {} dispatched requests finished", dispatched);
        dispatched
    }
}

/// Fetches one URL and sends its record, logging any failure
async fn scrape_url<S: PageSource + ?Sized>(
    source: &S,
    url: String,
    out: &mpsc::Sender<ResultRecord>,
) {
    let page = match source.fetch_page(&url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Dropping {}: {}", url, e);
            return;
        }
    };

    let metadata = extract_metadata(&page.body);
    let record = ResultRecord::new(url, page.status_code, metadata.title, metadata.description);

    if let Err(e) = out.send(record).await {
        tracing::warn!("Output closed, discarding record for {}", e.0.url);
    }
}

/// Accounts for one finished task
fn settle(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Scrape task failed: {}", e);
    }
}
