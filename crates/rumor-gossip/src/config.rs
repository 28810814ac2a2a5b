//! Process configuration, read once from the environment at startup.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::population::Population;

/// Number of peers in the population.
pub const PEERS_VAR: &str = "GOSSIP_PEERS";
/// Port of peer 0; peer `i` listens on `start + i`.
pub const START_PORT_VAR: &str = "GOSSIP_START_PORT";
/// Peers targeted per relay round.
pub const FANOUT_VAR: &str = "GOSSIP_FANOUT";
/// Seconds between origin broadcasts.
pub const SEND_INTERVAL_VAR: &str = "GOSSIP_SEND_INTERVAL";

/// Configuration for a gossip simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipConfig {
    /// Number of peers (N). Endpoints `0..=N` are started; commit fires when
    /// N of them saw a value.
    pub peers: usize,

    /// Port of the first peer.
    pub start_port: u16,

    /// Fanout per relay round (K).
    pub fanout: usize,

    /// Period of the origin broadcaster.
    pub send_interval: Duration,
}

impl GossipConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// Every variable is required; the first missing or malformed one is
    /// reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let peers: usize = required(&lookup, PEERS_VAR)?;
        let start_port: u16 = required(&lookup, START_PORT_VAR)?;
        let fanout: usize = required(&lookup, FANOUT_VAR)?;
        let send_interval: u64 = required(&lookup, SEND_INTERVAL_VAR)?;

        if fanout == 0 {
            return Err(Error::InvalidConfig {
                name: FANOUT_VAR,
                reason: "fanout must be at least 1".into(),
            });
        }
        if send_interval == 0 {
            return Err(Error::InvalidConfig {
                name: SEND_INTERVAL_VAR,
                reason: "interval must be at least 1 second".into(),
            });
        }

        let config = Self {
            peers,
            start_port,
            fanout,
            send_interval: Duration::from_secs(send_interval),
        };
        config.population()?;
        Ok(config)
    }

    /// The address block described by this configuration.
    pub fn population(&self) -> Result<Population> {
        Population::new(self.start_port, self.peers)
    }
}

fn required<T, F>(lookup: &F, name: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).ok_or(Error::MissingConfig(name))?;
    raw.parse().map_err(|e: T::Err| Error::InvalidConfig {
        name,
        reason: format!("{raw:?}: {e}"),
    })
}
