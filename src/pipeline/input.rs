//! URL input sources
//!
//! Both sources feed a bounded channel from a background task and close it
//! when they run out, so the scheduler sees the same lazily produced,
//! closeable sequence whether the list is known upfront or streamed.

use crate::ScrapeError;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Capacity of the channel between an input source and the scheduler
pub const INPUT_BUFFER: usize = 64;

/// Feeds a known list of URLs into a channel
///
/// Must be called within a tokio runtime.
pub fn urls_from_list(urls: Vec<String>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    tokio::spawn(async move {
        for url in urls {
            if tx.send(url).await.is_err() {
                tracing::debug!("URL consumer went away, stopping input");
                break;
            }
        }
    });

    rx
}

/// Streams URLs from a file, one per line
///
/// Blank lines and lines starting with `#` are skipped. The file is opened
/// before returning so a missing file is reported to the caller; read
/// errors after that end the input early and are logged.
pub async fn urls_from_file(path: &Path) -> Result<mpsc::Receiver<String>, ScrapeError> {
    let file = File::open(path).await?;
    let source = path.display().to_string();
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    tokio::spawn(async move {
        let mut lines = BufReader::new(file).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(url) = parse_url_line(&line) else {
                        continue;
                    };
                    if tx.send(url.to_string()).await.is_err() {
                        tracing::debug!("URL consumer went away, stopping input");
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read URLs from {}: {}", source, e);
                    break;
                }
            }
        }
    });

    Ok(rx)
}

/// Returns the URL on an input line, if any
pub fn parse_url_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}
