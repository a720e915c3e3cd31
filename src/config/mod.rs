//! Configuration module for url-meta-scraper
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default, so a run without a file behaves like the
//! defaults below. Loading does not validate: command-line flags are applied
//! on top by the binary, and the merged result is validated once.
//!
//! # Example
//!
//! ```no_run
//! use url_meta_scraper::config::{load_config, validate};
//! use std::path::Path;
//!
//! let mut config = load_config(Path::new("scraper.toml")).unwrap();
//! config.scraper.max_parallel = 4;
//! validate(&config).unwrap();
//! println!("Max parallel requests: {}", config.scraper.max_parallel);
//! ```

mod duration;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig};

pub use duration::parse_duration;
pub use parser::{load_config, parse_config};
pub use validation::validate;
