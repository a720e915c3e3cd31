//! CSV record sink
//!
//! Each record becomes one row: `date,url,status_code,title,description`.
//! Fields containing a comma, a double quote or a line break, fields that
//! start with any Unicode whitespace, and the field `\.` are wrapped in
//! double quotes with inner quotes doubled.

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::ResultRecord;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as CSV rows
pub struct CsvSink<W: Write> {
    writer: W,
    rows: usize,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &ResultRecord) -> OutputResult<()> {
        let row = record.to_row();
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");

        writeln!(self.writer, "{}", line)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field == "\\."
        || field.contains([',', '"', '\n', '\r'])
        || field.starts_with(char::is_whitespace);

    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
