//! Error types for the twinv-core library.

use thiserror::Error;

/// Main error type for the twinv library.
///
/// Extraction itself never errors; only persisting a result can. Unmatched
/// patterns and unparseable candidates are absent values, not failures.
#[derive(Error, Debug)]
pub enum TwinvError {
    /// I/O error while writing a result snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a record.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the twinv library.
pub type Result<T> = std::result::Result<T, TwinvError>;
