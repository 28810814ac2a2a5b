//! Error types for rumor-gossip.

use std::time::Duration;

use thiserror::Error;

/// Result type for rumor-gossip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the gossip engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration variable is not set.
    #[error("missing configuration variable {0}")]
    MissingConfig(&'static str),

    /// A configuration variable is set but unusable.
    #[error("invalid {name}: {reason}")]
    InvalidConfig {
        name: &'static str,
        reason: String,
    },

    /// A gossip payload was not the decimal text of an integer.
    #[error("body must be an integer, got {0:?}")]
    MalformedPayload(String),

    /// A delivery to another peer failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A delivery did not complete in time.
    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
}
