//! Error types for the rumor node.

use thiserror::Error;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while bootstrapping or serving.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or protocol error from the gossip engine
    #[error(transparent)]
    Gossip(#[from] rumor_gossip::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
