//! Rumor node binary
//!
//! Reads `GOSSIP_PEERS`, `GOSSIP_START_PORT`, `GOSSIP_FANOUT` and
//! `GOSSIP_SEND_INTERVAL`, then runs the simulation until Ctrl-C.

use rumor_gossip::GossipConfig;
use rumor_node::GossipNode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rumor_node=info,rumor_gossip=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Rumor node failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> rumor_node::Result<()> {
    let config = GossipConfig::from_env()?;
    GossipNode::new(config)?.run().await
}
