//! Error types for sortvis-trace.

use thiserror::Error;

/// Result type for sortvis-trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors raised when a trace event does not fit the array it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// An event referenced an index outside the array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
