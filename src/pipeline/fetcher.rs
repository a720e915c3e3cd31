//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured timeout
//! - GET requests with linear retry backoff
//! - Classifying responses as success or failure

use crate::config::{parse_duration, ScraperConfig};
use crate::ScrapeError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Highest status code treated as a successful fetch
///
/// Anything at or below this code counts as success, informational codes
/// included.
pub const MAX_SUCCESS_STATUS: u16 = 299;

/// Delay unit used when no backoff unit is configured
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// A page whose body has been read and released
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code of the successful response
    pub status_code: u16,

    /// Decoded response body
    pub body: String,
}

/// Something that can turn a URL into a fetched page
///
/// The scrape pipeline is generic over this trait so that scheduling can be
/// exercised without a network.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url`, returning its status code and body
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScrapeError>;
}

/// Returns true if a status code counts as a successful fetch
pub fn is_success(status_code: u16) -> bool {
    status_code <= MAX_SUCCESS_STATUS
}

/// Builds an HTTP client with the given per-request timeout
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP fetcher with per-attempt timeout and linear backoff
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    backoff_unit: Duration,
}

impl Fetcher {
    /// Creates a fetcher from a duration string and an attempt count
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout, e.g. `"10s"`
    /// * `max_retries` - Number of attempts per URL
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Ready to fetch
    /// * `Err(ScrapeError::InvalidConfig)` - The timeout is malformed or zero
    pub fn new(timeout: &str, max_retries: u32) -> Result<Self, ScrapeError> {
        let timeout =
            parse_duration(timeout).map_err(|e| ScrapeError::InvalidConfig(e.to_string()))?;
        if timeout.is_zero() {
            return Err(ScrapeError::InvalidConfig(
                "timeout must be positive".to_string(),
            ));
        }

        Ok(Self {
            client: build_http_client(timeout)?,
            timeout,
            max_retries,
            backoff_unit: DEFAULT_BACKOFF,
        })
    }

    /// Creates a fetcher from the `[scraper]` configuration section
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let backoff_unit = parse_duration(&config.backoff_unit)
            .map_err(|e| ScrapeError::InvalidConfig(e.to_string()))?;

        Ok(Self::new(&config.timeout, config.retry_count)?.with_backoff_unit(backoff_unit))
    }

    /// Replaces the backoff unit
    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay slept after the failed attempt with zero-based index `attempt`
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .checked_mul(attempt.saturating_add(1))
            .unwrap_or(Duration::MAX)
    }

    /// Fetches a URL, retrying failures with linear backoff
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Status <= 299 | Return the open response |
    /// | Status > 299 | Release body, wait `(i + 1)` units, retry |
    /// | Transport error or timeout | Wait `(i + 1)` units, retry |
    ///
    /// No wait follows the last attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The response, body still unread; the caller owns it
    /// * `Err(ScrapeError::FetchExhausted)` - Every attempt failed
    pub async fn fetch(&self, url: &str) -> Result<Response, ScrapeError> {
        for attempt in 0..self.max_retries {
            tracing::info!(
                "Fetching {} (attempt {}/{})",
                url,
                attempt + 1,
                self.max_retries
            );

            match self.client.get(url).send().await {
                Ok(response) if is_success(response.status().as_u16()) => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    // Dropping the response releases its connection
                    drop(response);
                    tracing::error!("Failed to fetch {}: status code {}", url, status);
                }
                Err(e) => {
                    tracing::error!("Failed to fetch {}: {}", url, e);
                }
            }

            if attempt + 1 < self.max_retries {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        Err(ScrapeError::FetchExhausted {
            url: url.to_string(),
            attempts: self.max_retries,
        })
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let response = self.fetch(url).await?;
        let status_code = response.status().as_u16();

        let body = response.text().await.map_err(|e| ScrapeError::Parse {
            url: url.to_string(),
            message: format!("failed to read body: {}", e),
        })?;

        Ok(FetchedPage { status_code, body })
    }
}
