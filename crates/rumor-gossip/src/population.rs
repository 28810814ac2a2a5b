//! The fixed population of gossip endpoints and fanout selection over it.
//!
//! A population configured with `N` peers has endpoints for every id in
//! `0..=N` (so `N + 1` listeners), each on `127.0.0.1:(start_port + id)`.
//! Commit still fires at a tally of `N`, so the last peer to hear a value
//! pushes the tally past the commit point. The mapping never changes for the
//! lifetime of the process.

use std::net::{Ipv4Addr, SocketAddr};

use rand::Rng;

use crate::config::PEERS_VAR;
use crate::error::{Error, Result};

/// Index of one endpoint in the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub usize);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contiguous block of localhost ports `start_port ..= start_port + peers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    start_port: u16,
    peers: usize,
}

impl Population {
    /// Create the population for `peers` (N) starting at `start_port`.
    ///
    /// Fails when N is zero or the last port, `start_port + N`, would not
    /// fit in a `u16`.
    pub fn new(start_port: u16, peers: usize) -> Result<Self> {
        if peers == 0 {
            return Err(Error::InvalidConfig {
                name: PEERS_VAR,
                reason: "population must hold at least one peer".into(),
            });
        }

        let last = start_port as usize + peers;
        if last > u16::MAX as usize {
            return Err(Error::InvalidConfig {
                name: PEERS_VAR,
                reason: format!("ports {start_port}..={last} run past port {}", u16::MAX),
            });
        }

        Ok(Self { start_port, peers })
    }

    /// The configured N; also the tally at which a value commits.
    pub fn peers(&self) -> usize {
        self.peers
    }

    /// Number of listening endpoints, N + 1.
    pub fn endpoints(&self) -> usize {
        self.peers + 1
    }

    /// Port of peer 0.
    pub fn start_port(&self) -> u16 {
        self.start_port
    }

    /// All endpoint ids `0..=N`, in port order.
    pub fn ids(&self) -> impl Iterator<Item = PeerId> {
        (0..=self.peers).map(PeerId)
    }

    /// Port a peer listens on, if the id belongs to this population.
    pub fn port_of(&self, id: PeerId) -> Option<u16> {
        (id.0 <= self.peers).then(|| self.start_port + id.0 as u16)
    }

    /// Socket address a peer listens on.
    pub fn address_of(&self, id: PeerId) -> Option<SocketAddr> {
        self.port_of(id)
            .map(|port| SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }

    /// Pick `fanout` distinct addresses uniformly without replacement from
    /// the whole range.
    ///
    /// The caller's own address is not excluded. A fanout larger than the
    /// range selects every endpoint once.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, fanout: usize) -> Vec<SocketAddr> {
        let endpoints = self.endpoints();
        rand::seq::index::sample(rng, endpoints, fanout.min(endpoints))
            .into_iter()
            .filter_map(|index| self.address_of(PeerId(index)))
            .collect()
    }
}
