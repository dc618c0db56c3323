//! Dataset error types
//!
//! Only boundary failures are errors here: a source file that cannot be found
//! or parsed, a lookup against a column the table does not carry, or a query
//! that names an unknown filter value. Bad cells never surface as errors; the
//! normalization pipeline replaces them with column defaults.
//!
//! # Examples
//!
//! ```rust
//! use got_deaths::errors::DatasetError;
//!
//! let err = DatasetError::MissingColumn("ID".to_string());
//! assert_eq!(err.error_code(), "MISSING_COLUMN");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Dataset loading and query errors
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Source file does not exist
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Source could not be parsed as delimited UTF-8 text
    #[error("Failed to parse {origin}: {source}")]
    Load {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// Source has no header row
    #[error("No header row found in {0}")]
    EmptySource(String),

    /// Column required by an operation is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Query parameter outside its accepted domain
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Stable machine-readable code for API payloads
    pub fn error_code(&self) -> &'static str {
        match self {
            DatasetError::NotFound(_) => "NOT_FOUND",
            DatasetError::Load { .. } => "LOAD_FAILED",
            DatasetError::EmptySource(_) => "EMPTY_SOURCE",
            DatasetError::MissingColumn(_) => "MISSING_COLUMN",
            DatasetError::InvalidFilter(_) => "INVALID_FILTER",
            DatasetError::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_mentions_path() {
        let err = DatasetError::NotFound(PathBuf::from("character-deaths.csv"));
        assert_eq!(err.to_string(), "Data file not found: character-deaths.csv");
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn invalid_filter_code() {
        let err = DatasetError::InvalidFilter("status=zombie".to_string());
        assert_eq!(err.error_code(), "INVALID_FILTER");
    }
}
