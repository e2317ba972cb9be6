//! Error types for connectivity monitoring.

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, ConnectivityError>;

/// Errors that can occur while managing the platform subscription.
///
/// Event delivery itself is infallible; only registering and unregistering
/// the platform watcher can fail.
#[derive(Debug, thiserror::Error)]
pub enum ConnectivityError {
    /// The platform interface watcher could not be started.
    #[error("Failed to start network watcher: {0}")]
    Watch(String),
}
