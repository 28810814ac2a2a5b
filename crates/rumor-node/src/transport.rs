//! HTTP transport: `PUT /gossip` between localhost peers.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use rumor_gossip::{encode_value, Delivery, Error as GossipError, Transport, Value};
use tokio::net::TcpListener;

use crate::api::{self, SharedPeer, GOSSIP_PATH};
use crate::error::Result;

/// Upper bound on one delivery, connect to response body.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Client side of the gossip wire protocol.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Transport bounded by [`DELIVERY_TIMEOUT`].
    pub fn new() -> Result<Self> {
        Self::with_timeout(DELIVERY_TIMEOUT)
    }

    /// Transport whose deliveries give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn client_error(&self, e: reqwest::Error) -> GossipError {
        if e.is_timeout() {
            GossipError::Timeout(self.timeout)
        } else {
            GossipError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, target: SocketAddr, value: Value) -> rumor_gossip::Result<Delivery> {
        let url = format!("http://{target}{GOSSIP_PATH}");
        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(encode_value(value))
            .send()
            .await
            .map_err(|e| self.client_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GossipError::Transport(format!("{url} answered {status}")));
        }

        let body = response.text().await.map_err(|e| self.client_error(e))?;
        Ok(if body.is_empty() {
            Delivery::Accepted
        } else {
            Delivery::Duplicate(body)
        })
    }
}

/// Bind `addr` and serve one peer on it until the listener fails.
pub async fn serve(addr: SocketAddr, peer: SharedPeer) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, api::build_router(peer)).await?;
    Ok(())
}
