//! Error taxonomy for the batch pipeline.
//!
//! Table-level failures (bad spreadsheet reference, CSV fetch/parse, schema)
//! abort a batch before any image download starts. Per-image failures are
//! local: they are logged, counted, and never abort sibling downloads.

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("invalid spreadsheet URL (no /d/<id> segment): {url}")]
    InvalidSpreadsheetUrl { url: String },

    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("spreadsheet contains no data rows")]
    NoData,

    #[error("storage error at {path}: {source}")]
    Storage {
        path: String,
        source: std::io::Error,
    },

    #[error("size mismatch for {path}: expected {expected} bytes, wrote {actual}")]
    SizeMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },
}

impl BatchError {
    pub fn request(url: &str, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            source,
        }
    }

    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error aborts the whole batch (as opposed to failing a
    /// single download task).
    pub fn is_table_level(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpreadsheetUrl { .. }
                | Self::Csv(_)
                | Self::MissingColumn(_)
                | Self::NoData
        )
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
