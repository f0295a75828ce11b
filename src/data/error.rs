use serde::Serialize;
use thiserror::Error;

/// The catalog source could not be fetched or parsed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// A movie duration that does not look like `"<N> min"`.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("row {row}: cannot parse duration '{value}'")]
pub struct ParseError {
    /// Index of the offending row in the catalog.
    pub row: usize,
    pub value: String,
}
