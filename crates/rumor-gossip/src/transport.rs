//! Point-to-point delivery of gossip values between peers.
//!
//! The engine only needs a way to push one value to one address and learn
//! whether the receiver took it. Concrete transports (HTTP in `rumor-node`,
//! in-memory routing in tests) live outside this crate.

use std::net::SocketAddr;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::Value;

/// What the receiving peer did with a delivered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The value was new to the receiver.
    Accepted,
    /// The receiver had already seen the value; carries its notice.
    Duplicate(String),
}

/// Best-effort, at-most-once delivery of a single value.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver `value` to the peer listening on `target`.
    ///
    /// Implementations bound the call with a timeout. Errors are reported to
    /// the caller but never retried here.
    async fn send(&self, target: SocketAddr, value: Value) -> Result<Delivery>;
}

/// Wire form of a value: its decimal text.
pub fn encode_value(value: Value) -> String {
    value.to_string()
}

/// Parse a wire payload. Surrounding whitespace is not tolerated.
pub fn decode_value(body: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::MalformedPayload(String::from_utf8_lossy(body).into_owned()))?;
    text.parse()
        .map_err(|_| Error::MalformedPayload(text.to_string()))
}
