//! Common error types for moviedb

use thiserror::Error;

/// Common result type for moviedb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the import pipeline and database layer.
///
/// Everything here is structural: callers propagate these up to the process
/// entry point, which aborts before the gateway starts listening. Row-level
/// import failures are logged and skipped instead of being surfaced as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
