//! url-meta-scraper: bounded-concurrency page metadata scraper
//!
//! This crate fetches a fixed list of URLs, extracts each page's title and
//! meta description, and emits one record per successfully fetched page.
//! Fetches run concurrently up to a configurable ceiling, with per-request
//! timeouts and linear retry backoff.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod record;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{extract_metadata, Fetcher, PageMetadata, Scraper};
pub use record::ResultRecord;
