//! Fanout relay: single rounds and bounded relay cycles.
//!
//! A round picks `fanout` random peers and pushes one value to each of them
//! concurrently. A cycle is a fixed number of rounds on a fixed interval,
//! started when a peer first accepts a value. Cycles are never cancelled;
//! the number currently running is tracked only so it can be observed.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::population::Population;
use crate::transport::{Delivery, Transport};
use crate::Value;

/// Rounds in one relay cycle.
pub const RELAY_ROUNDS: usize = 5;

/// Pause before each relay round.
pub const RELAY_INTERVAL: Duration = Duration::from_secs(1);

/// Shape of a relay cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySchedule {
    pub rounds: usize,
    pub interval: Duration,
}

impl Default for RelaySchedule {
    fn default() -> Self {
        Self {
            rounds: RELAY_ROUNDS,
            interval: RELAY_INTERVAL,
        }
    }
}

/// Sends values to random subsets of the population.
#[derive(Clone)]
pub struct Relay {
    transport: Arc<dyn Transport>,
    population: Population,
    fanout: usize,
    schedule: RelaySchedule,
    active: Arc<AtomicUsize>,
}

impl Relay {
    /// Relay over `population`, `fanout` targets per round, default schedule.
    pub fn new(transport: Arc<dyn Transport>, population: Population, fanout: usize) -> Self {
        Self {
            transport,
            population,
            fanout,
            schedule: RelaySchedule::default(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override the cycle shape.
    #[must_use]
    pub fn with_schedule(mut self, schedule: RelaySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Relay cycles started by this relay that have not finished yet.
    pub fn active_cycles(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Draw the targets for one round.
    pub fn targets(&self) -> Vec<SocketAddr> {
        self.population.sample(&mut rand::thread_rng(), self.fanout)
    }

    /// Run one round in the background.
    ///
    /// Deliveries to the chosen targets proceed concurrently; a failed
    /// delivery is logged and dropped without affecting the others.
    pub fn round(&self, value: Value) -> JoinHandle<()> {
        let targets = self.targets();
        let transport = Arc::clone(&self.transport);

        tokio::spawn(async move {
            let deliveries = targets.into_iter().map(|target| {
                let transport = Arc::clone(&transport);
                async move { (target, transport.send(target, value).await) }
            });

            for (target, result) in join_all(deliveries).await {
                match result {
                    Ok(Delivery::Accepted) => {
                        debug!(%target, value, "delivered");
                    }
                    Ok(Delivery::Duplicate(notice)) => {
                        debug!(%target, value, notice = notice.trim_end(), "already seen");
                    }
                    Err(e) => {
                        warn!(%target, value, "Failed to contact peer: {}", e);
                    }
                }
            }
        })
    }

    /// Start a relay cycle for `value`.
    ///
    /// The first round fires one interval from now; each round is spawned
    /// independently so a slow delivery never delays the schedule.
    pub fn spawn_cycle(&self, value: Value) -> JoinHandle<()> {
        let relay = self.clone();
        let guard = ActiveCycle::enter(&self.active);

        tokio::spawn(async move {
            let _guard = guard;
            let interval = relay.schedule.interval;
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for round in 1..=relay.schedule.rounds {
                ticker.tick().await;
                debug!(value, round, "relay round");
                relay.round(value);
            }
        })
    }
}

/// Holds one slot of the active-cycle gauge for as long as it lives.
struct ActiveCycle(Arc<AtomicUsize>);

impl ActiveCycle {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(active))
    }
}

impl Drop for ActiveCycle {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
