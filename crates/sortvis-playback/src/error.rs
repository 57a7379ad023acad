//! Error types for sortvis-playback.

use thiserror::Error;

/// Result type for sortvis-playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while controlling playback.
#[derive(Debug, Error)]
pub enum Error {
    /// A run (or its finish grace period) is still in progress.
    #[error("a sort run is already in progress")]
    AlreadyRunning,

    /// Stop was requested but no run is active.
    #[error("no sort run is active")]
    NotRunning,

    /// A trace event did not fit the array.
    #[error("trace error: {0}")]
    Trace(#[from] sortvis_trace::TraceError),
}
