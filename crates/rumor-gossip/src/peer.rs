//! A single gossip endpoint.
//!
//! Each peer owns the set of values it has seen. The first reception of a
//! value is recorded, reported to the convergence counter and starts one
//! relay cycle; every later reception of the same value is a no-op apart
//! from the duplicate notice returned to the sender.

use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::counter::Observation;
use crate::population::PeerId;
use crate::relay::Relay;
use crate::Value;

/// Result of handing a value to a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First sighting: recorded, reported and relayed.
    Accepted,
    /// Already seen; nothing changed.
    Duplicate,
}

/// One gossip endpoint and the values it has seen.
pub struct Peer {
    id: PeerId,
    port: u16,
    seen: HashSet<Value>,
    observations: UnboundedSender<Observation>,
    relay: Relay,
}

impl Peer {
    /// A peer that has seen nothing yet.
    pub fn new(
        id: PeerId,
        port: u16,
        observations: UnboundedSender<Observation>,
        relay: Relay,
    ) -> Self {
        Self {
            id,
            port,
            seen: HashSet::new(),
            observations,
            relay,
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn has_seen(&self, value: Value) -> bool {
        self.seen.contains(&value)
    }

    /// Number of distinct values this peer has accepted.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Relay cycles started by this peer that are still running.
    pub fn active_relays(&self) -> usize {
        self.relay.active_cycles()
    }

    /// Handle one incoming value. Must be called inside a tokio runtime.
    pub fn receive(&mut self, value: Value) -> Outcome {
        if !self.seen.insert(value) {
            debug!(peer = %self.id, value, "duplicate");
            return Outcome::Duplicate;
        }

        let observation = Observation {
            peer: self.id,
            value,
        };
        if self.observations.send(observation).is_err() {
            warn!(peer = %self.id, value, "convergence counter has shut down");
        }

        self.relay.spawn_cycle(value);
        Outcome::Accepted
    }

    /// Body returned to a sender whose value was already seen.
    pub fn duplicate_notice(&self, value: Value) -> String {
        format!("peer {} already saw {}\n", self.id, value)
    }
}
