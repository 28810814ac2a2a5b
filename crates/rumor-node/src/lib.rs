//! Rumor Node - a whole gossip population in one process
//!
//! Runs every peer of a simulated epidemic broadcast as its own HTTP
//! endpoint on localhost, plus the origin broadcaster that invents new
//! versions and the convergence counter that reports commits.
//!
//! # Architecture
//!
//! - **API**: per-peer axum router (`PUT /gossip`, `GET /status`)
//! - **Transport**: reqwest client implementing the gossip engine's
//!   `Transport` seam
//! - **Node**: reads the population layout and spawns everything
//!
//! # Example
//!
//! ```no_run
//! use rumor_gossip::GossipConfig;
//! use rumor_node::GossipNode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let node = GossipNode::new(GossipConfig::from_env()?)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod node;
pub mod transport;

pub use error::{Error, Result};
pub use node::GossipNode;
pub use transport::HttpTransport;
