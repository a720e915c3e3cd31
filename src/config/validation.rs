use crate::config::duration::parse_duration;
use crate::config::types::{Config, OutputConfig, ScraperConfig};
use crate::ConfigError;

/// Upper bound on concurrent fetches
pub const MAX_PARALLEL_LIMIT: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetch and scheduling configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let timeout = parse_duration(&config.timeout)?;
    if timeout.is_zero() {
        return Err(ConfigError::Validation(format!(
            "timeout must be positive, got '{}'",
            config.timeout
        )));
    }

    parse_duration(&config.backoff_unit)?;

    // retry_count == 0 is legal: every URL is dropped without a request

    if config.max_parallel < 1 || config.max_parallel > MAX_PARALLEL_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_parallel must be between 1 and {}, got {}",
            MAX_PARALLEL_LIMIT, config.max_parallel
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
