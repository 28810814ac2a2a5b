//! Rumor Gossip - epidemic broadcast engine
//!
//! Simulates push gossip over a fixed population of local peers and counts
//! how the population converges on each value.
//!
//! # Architecture
//!
//! - **Peer**: owns its dedup set; first reception reports to the counter and
//!   starts a relay cycle
//! - **Relay**: 5 rounds, 1 second apart, each pushing to `fanout` random peers
//! - **Origin**: invents version 1, 2, 3, ... and seeds each with one round
//! - **Counter**: single consumer that tallies first observations and reports
//!   commit when a tally reaches the configured peer count N
//! - **Transport**: seam for point-to-point delivery (HTTP lives in `rumor-node`)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rumor_gossip::{
//!     observation_channel, ConvergenceCounter, GossipConfig, Peer, Relay, Transport,
//! };
//!
//! # async fn example(transport: Arc<dyn Transport>) -> rumor_gossip::Result<()> {
//! let config = GossipConfig::from_env()?;
//! let population = config.population()?;
//! let (observations, rx) = observation_channel();
//! tokio::spawn(ConvergenceCounter::new(population.peers()).run(rx));
//!
//! for id in population.ids() {
//!     let relay = Relay::new(Arc::clone(&transport), population, config.fanout);
//!     let port = population.port_of(id).expect("id from population");
//!     let _peer = Peer::new(id, port, observations.clone(), relay);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod origin;
pub mod peer;
pub mod population;
pub mod relay;
pub mod transport;

/// A gossiped version number. Only identity matters to the protocol.
pub type Value = i64;

pub use config::GossipConfig;
pub use counter::{observation_channel, ConvergenceCounter, Observation, Report};
pub use error::{Error, Result};
pub use origin::OriginBroadcaster;
pub use peer::{Outcome, Peer};
pub use population::{PeerId, Population};
pub use relay::{Relay, RelaySchedule, RELAY_INTERVAL, RELAY_ROUNDS};
pub use transport::{decode_value, encode_value, Delivery, Transport};
