//! Output module for writing scrape results
//!
//! This module handles:
//! - The sink interface records are written through
//! - CSV serialization of records
//! - The end-of-run summary

mod csv;
mod traits;

pub use csv::CsvSink;
pub use traits::{OutputError, OutputResult, RecordSink, RunSummary};
