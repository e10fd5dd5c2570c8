//! Error types for feature construction.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while turning a raw count table into features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A column the builder depends on is absent from the table.
    #[error("Required column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingColumn {
        /// Name of the absent column
        column: String,
        /// Columns that were present
        available: Vec<String>,
    },

    /// A `date` cell could not be read as a calendar date.
    #[error("Could not parse date '{value}' in row {row}")]
    InvalidDate {
        /// Zero-based row index after null removal
        row: usize,
        /// Raw cell text
        value: String,
    },

    /// The date column has a type that cannot hold dates.
    #[error("Column '{column}' has type {dtype}, which cannot be read as dates")]
    UnsupportedDateType { column: String, dtype: String },

    /// The `count` column could not be coerced to numbers.
    #[error("Column '{column}' could not be read as numeric: {reason}")]
    InvalidCount { column: String, reason: String },

    /// `ln(1 + count)` is undefined or infinite for a row.
    #[error("log1p of count {value} in row {row} is not finite")]
    InvalidLogCount { row: usize, value: f64 },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
