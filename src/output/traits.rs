//! Output sink traits and types
//!
//! This module defines the trait interface for record sinks and the
//! summary reported at the end of a run.

use crate::record::ResultRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Counts reported when a run finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs handed to a fetch task
    pub dispatched: usize,

    /// Records accepted by the sink
    pub written: usize,
}

impl RunSummary {
    /// URLs that produced no record
    pub fn dropped(&self) -> usize {
        self.dispatched.saturating_sub(self.written)
    }
}

/// Trait for record sinks
///
/// Sinks receive records one at a time from the single consumer of the
/// pipeline's output channel, so implementations need no locking.
pub trait RecordSink {
    /// Writes one record
    fn write_record(&mut self, record: &ResultRecord) -> OutputResult<()>;

    /// Flushes anything buffered; called once after the last record
    fn finish(&mut self) -> OutputResult<()>;
}
