//! Error types for the transaction report.
//!
//! Only file-level and configuration failures are errors. Problems with an
//! individual record are [`ValidationFailure`](crate::transaction::ValidationFailure)s
//! and never abort a run.

use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while producing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input file does not exist
    #[error("File '{path}' not found.")]
    FileNotFound { path: String },

    /// The input file exists but could not be opened or read
    #[error("Could not read '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<ReportError>,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Bad command-line usage
    #[error("{0}. Usage: transaction-report [--no-clear] [--balances-csv <path>] [input.csv]")]
    Config(String),
}

impl ReportError {
    /// Wraps an error raised while opening or reading `path`.
    ///
    /// A missing file gets its own variant so the driver can report it plainly.
    pub fn for_file(path: &str, err: ReportError) -> Self {
        let not_found = match &err {
            ReportError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            ReportError::Csv(e) => matches!(
                e.kind(),
                csv::ErrorKind::Io(inner) if inner.kind() == std::io::ErrorKind::NotFound
            ),
            _ => false,
        };

        if not_found {
            ReportError::FileNotFound {
                path: path.to_string(),
            }
        } else {
            ReportError::ReadFailed {
                path: path.to_string(),
                source: Box::new(err),
            }
        }
    }

    /// Returns `true` for the file-not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReportError::FileNotFound { .. })
    }
}
