use serde::Deserialize;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: &str = "10s";

/// Default number of fetch attempts per URL
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default ceiling on in-flight requests
pub const DEFAULT_MAX_PARALLEL: usize = 10;

/// Default delay unit for linear retry backoff
pub const DEFAULT_BACKOFF_UNIT: &str = "1s";

/// Default CSV output path
pub const DEFAULT_CSV_PATH: &str = "result.csv";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Fetch and scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScraperConfig {
    /// Per-request timeout as a duration string (e.g. "10s", "1m30s")
    pub timeout: String,

    /// Number of fetch attempts per URL before it is dropped
    pub retry_count: u32,

    /// Maximum number of concurrent fetches
    pub max_parallel: usize,

    /// Backoff unit; attempt `i` waits `(i + 1)` units before retrying
    pub backoff_unit: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT.to_string(),
            retry_count: DEFAULT_RETRY_COUNT,
            max_parallel: DEFAULT_MAX_PARALLEL,
            backoff_unit: DEFAULT_BACKOFF_UNIT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the CSV file receiving one row per scraped page
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}
