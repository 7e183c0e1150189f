//! Error types for loading the stock dataset

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for data provider operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading the dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("File I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Malformed row at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("No usable records in {}", path.display())]
    Empty { path: PathBuf },
}

impl DataError {
    /// True for failures to open or read the file
    pub fn is_io(&self) -> bool {
        matches!(self, DataError::Io { .. })
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line());
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => DataError::Io { source },
            _ => DataError::Parse { line, message },
        }
    }
}

impl From<csv_async::Error> for DataError {
    fn from(err: csv_async::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line());
        let message = err.to_string();
        match err.into_kind() {
            csv_async::ErrorKind::Io(source) => DataError::Io { source },
            _ => DataError::Parse { line, message },
        }
    }
}
