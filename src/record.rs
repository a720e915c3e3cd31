//! Result records emitted by the scrape pipeline

use chrono::{Local, NaiveDate};

/// Number of fields in a rendered record row
pub const RECORD_FIELDS: usize = 5;

/// One output row describing a successfully scraped page
///
/// Records are immutable once built. Field order in [`ResultRecord::to_row`]
/// is fixed: date, url, status code, title, description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Local calendar date the page was scraped
    pub date: NaiveDate,

    /// The URL as it was read from the input
    pub url: String,

    /// HTTP status code of the successful response
    pub status_code: u16,

    /// Text of the page's `<title>`, or empty
    pub title: String,

    /// Content of the page's `<meta name="description">`, or empty
    pub description: String,
}

impl ResultRecord {
    /// Builds a record dated today in the local timezone
    pub fn new(url: String, status_code: u16, title: String, description: String) -> Self {
        Self {
            date: Local::now().date_naive(),
            url,
            status_code,
            title,
            description,
        }
    }

    /// Renders the record as its five output fields
    pub fn to_row(&self) -> [String; RECORD_FIELDS] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.url.clone(),
            self.status_code.to_string(),
            self.title.clone(),
            self.description.clone(),
        ]
    }
}
