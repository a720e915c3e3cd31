//! Run coordination
//!
//! Connects an input channel, the scraper, and a record sink into one run.
//! The dispatch loop and the sink writer run concurrently on the same task,
//! so the sink is the single consumer of the output channel.

use crate::config::Config;
use crate::output::{CsvSink, OutputError, RecordSink, RunSummary};
use crate::pipeline::fetcher::PageSource;
use crate::pipeline::scheduler::Scraper;
use crate::ScrapeError;
use std::path::Path;
use tokio::sync::mpsc;

/// Scrapes every URL from `urls` and writes the records to `sink`
///
/// A sink failure ends the run with an error once the pipeline has drained;
/// records produced after the failure are discarded.
pub async fn run_scrape<S, K>(
    scraper: &Scraper<S>,
    urls: mpsc::Receiver<String>,
    sink: &mut K,
) -> Result<RunSummary, ScrapeError>
where
    S: PageSource + 'static,
    K: RecordSink,
{
    let (tx, mut rx) = mpsc::channel(scraper.max_parallel());

    // rx drops with this block, so a failed sink cannot leave senders blocked
    let write = async move {
        let mut written = 0;
        while let Some(record) = rx.recv().await {
            sink.write_record(&record)?;
            written += 1;
        }
        sink.finish()?;
        Ok::<usize, OutputError>(written)
    };

    let (dispatched, written) = tokio::join!(scraper.run(urls, tx), write);
    let written = written?;

    Ok(RunSummary {
        dispatched,
        written,
    })
}

/// Runs a complete scrape into the configured CSV file
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `urls` - Input channel; the run ends once it closes and all work drains
///
/// # Returns
///
/// * `Ok(RunSummary)` - Counts of dispatched URLs and written rows
/// * `Err(ScrapeError)` - Construction failed or the CSV file could not be written
pub async fn run_to_csv(
    config: &Config,
    urls: mpsc::Receiver<String>,
) -> Result<RunSummary, ScrapeError> {
    let scraper = Scraper::from_config(&config.scraper)?;
    let mut sink = CsvSink::create(Path::new(&config.output.csv_path))?;

    tracing::info!(
        "Writing results to {} ({} parallel requests)",
        config.output.csv_path,
        scraper.max_parallel()
    );

    let summary = run_scrape(&scraper, urls, &mut sink).await?;

    tracing::info!(
        "Scrape finished: {} dispatched, {} written, {} dropped",
        summary.dispatched,
        summary.written,
        summary.dropped()
    );

    Ok(summary)
}
