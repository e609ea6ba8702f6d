//! Error types for actelem

use std::io;
use thiserror::Error;

/// Result type for actelem operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors that can occur while opening the telemetry page or decoding records
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Input buffer length disagrees with the record layout
    #[error("buffer length {got} does not match record layout size {expected}")]
    LayoutMismatch { expected: usize, got: usize },

    /// Malformed record layout
    #[error("malformed record layout: {reason}")]
    Schema { reason: String },

    /// Failed to open the shared memory page
    #[error("failed to open shared memory page '{name}': {source}")]
    ShmOpen {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Shared memory page is smaller than the record layout requires
    #[error("shared memory page '{name}' holds {got} bytes, record layout needs {expected}")]
    ShmSize {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Failed to map the page
    #[error("failed to map shared memory page: {0}")]
    Mmap(#[source] io::Error),
}
