//! Rumor node - bootstraps the whole simulated population in one process.
//!
//! Architecture:
//! - One HTTP listener per peer id in `0..=N`, on `start_port + id`
//! - One convergence counter fed by every peer
//! - One origin broadcaster seeding a new version every interval

use std::sync::Arc;

use rumor_gossip::{
    observation_channel, ConvergenceCounter, GossipConfig, OriginBroadcaster, Peer, Population,
    Relay, Transport,
};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::transport::{serve, HttpTransport};

/// A configured, not yet running, gossip simulation.
pub struct GossipNode {
    config: GossipConfig,
    population: Population,
}

impl GossipNode {
    /// Validate the configuration. No sockets are opened yet.
    pub fn new(config: GossipConfig) -> Result<Self> {
        let population = config.population()?;
        Ok(Self { config, population })
    }

    pub fn population(&self) -> Population {
        self.population
    }

    /// Start every peer, the counter and the origin, then run until the
    /// process receives Ctrl-C.
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            peers = self.population.peers(),
            endpoints = self.population.endpoints(),
            start_port = self.population.start_port(),
            fanout = self.config.fanout,
            interval = ?self.config.send_interval,
            "Rumor node starting"
        );

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
        self.start(transport);

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down");
        Ok(())
    }

    /// Spawn the counter, one server per peer and the origin.
    fn start(&self, transport: Arc<dyn Transport>) {
        let population = self.population;
        let fanout = self.config.fanout;

        let (observations, rx) = observation_channel();
        tokio::spawn(ConvergenceCounter::new(population.peers()).run(rx));

        for id in population.ids() {
            let (Some(addr), Some(port)) = (population.address_of(id), population.port_of(id))
            else {
                continue;
            };

            let relay = Relay::new(Arc::clone(&transport), population, fanout);
            let peer = Arc::new(Mutex::new(Peer::new(id, port, observations.clone(), relay)));

            tokio::spawn(async move {
                tracing::info!("Starting peer {} on port {}", id, port);
                if let Err(e) = serve(addr, peer).await {
                    tracing::error!("Peer {} stopped: {}", id, e);
                }
            });
        }

        let origin = OriginBroadcaster::new(
            Relay::new(transport, population, fanout),
            self.config.send_interval,
        );
        tokio::spawn(origin.run());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rejects_population_past_last_port() {
        let config = GossipConfig {
            peers: 10,
            start_port: 65_530,
            fanout: 3,
            send_interval: Duration::from_secs(1),
        };

        assert!(GossipNode::new(config).is_err());
    }

    #[test]
    fn exposes_population() {
        let config = GossipConfig {
            peers: 4,
            start_port: 9100,
            fanout: 2,
            send_interval: Duration::from_secs(1),
        };

        let node = GossipNode::new(config).unwrap();
        assert_eq!(node.population().peers(), 4);
        assert_eq!(node.population().endpoints(), 5);
        assert_eq!(node.population().start_port(), 9100);
    }
}
