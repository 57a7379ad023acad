//! Error types for the visualizer front.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or serving the visualizer.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Playback refused or failed
    #[error("Playback error: {0}")]
    Playback(#[from] sortvis_playback::Error),

    /// Bad environment or command line value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
