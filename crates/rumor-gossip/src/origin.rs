//! The origin broadcaster invents new versions and seeds them into the mesh.
//!
//! It is not a peer: it keeps no dedup state and never receives anything.
//! Each period it bumps its version counter and runs a single relay round.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::relay::Relay;
use crate::Value;

/// Seeds version 1, 2, 3, ... into the mesh, one per interval.
pub struct OriginBroadcaster {
    relay: Relay,
    interval: Duration,
    version: Value,
}

impl OriginBroadcaster {
    /// A broadcaster whose first version will be 1.
    pub fn new(relay: Relay, interval: Duration) -> Self {
        Self {
            relay,
            interval,
            version: 0,
        }
    }

    /// Advance the counter and seed the new version with one relay round.
    pub fn broadcast_next(&mut self) -> (Value, JoinHandle<()>) {
        self.version += 1;
        info!("Sending version {}", self.version);
        (self.version, self.relay.round(self.version))
    }

    /// Broadcast forever, one version per interval, starting one interval
    /// from now.
    pub async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.broadcast_next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::population::Population;
    use crate::transport::{Delivery, Transport};
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Instant, Value)>>);

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, _target: SocketAddr, value: Value) -> Result<Delivery> {
            self.0.lock().unwrap().push((Instant::now(), value));
            Ok(Delivery::Accepted)
        }
    }

    fn origin(recorder: Arc<Recorder>, interval: Duration) -> OriginBroadcaster {
        let relay = Relay::new(recorder, Population::new(9000, 5).unwrap(), 2);
        OriginBroadcaster::new(relay, interval)
    }

    #[tokio::test]
    async fn versions_start_at_one() {
        let recorder = Arc::new(Recorder::default());
        let mut origin = origin(Arc::clone(&recorder), Duration::from_secs(1));

        let (first, round) = origin.broadcast_next();
        round.await.unwrap();
        let (second, round) = origin.broadcast_next();
        round.await.unwrap();

        assert_eq!((first, second), (1, 2));
        let values: Vec<_> = recorder.0.lock().unwrap().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 1, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn run_broadcasts_once_per_interval() {
        let recorder = Arc::new(Recorder::default());
        let started = Instant::now();
        let task = tokio::spawn(origin(Arc::clone(&recorder), Duration::from_secs(2)).run());

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        task.abort();

        let sent = recorder.0.lock().unwrap();
        let schedule: Vec<_> = sent
            .iter()
            .map(|(at, value)| ((*at - started).as_secs(), *value))
            .collect();
        assert_eq!(schedule, vec![(2, 1), (2, 1), (4, 2), (4, 2), (6, 3), (6, 3)]);
    }
}
