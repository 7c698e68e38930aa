//! Error types for the bicimad library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bicimad operations.
#[derive(Debug, Error)]
pub enum BicimadError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Month or year outside the supported range.
    #[error("invalid period: month must be 1-12 and year 21-23, got month {month}, year {year}")]
    InvalidPeriod { month: u32, year: u32 },

    /// No catalog entry for an otherwise valid month/year.
    #[error("no trip archive available for month {month}, year {year}")]
    ArchiveNotFound { month: u32, year: u32 },

    /// The downloaded archive contains no trips CSV.
    #[error("no trips CSV entry in archive from '{url}'")]
    CsvNotInArchive { url: String },

    /// A required column is missing from the trip export.
    #[error("missing column '{0}' in trip data")]
    MissingColumn(String),

    /// Empty table or no data to aggregate.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A malformed access-log line.
    #[error("malformed log line: {0}")]
    LogFormat(String),

    /// Grid pair shapes differ.
    #[error("grid shape mismatch: zones are {zones:?}, values are {values:?}")]
    ShapeMismatch {
        zones: (usize, usize),
        values: (usize, usize),
    },

    /// Zone grid holds a non-integral cell.
    #[error("zone grid must be integral, found {value} at {row},{col}")]
    NonIntegerZone { value: f64, row: usize, col: usize },

    /// A grid text file has rows of differing widths.
    #[error("ragged grid in '{path}': row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell failed numeric parsing.
    #[error("parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reading a zip archive.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for bicimad operations.
pub type Result<T> = std::result::Result<T, BicimadError>;
