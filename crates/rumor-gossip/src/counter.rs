//! Convergence counting.
//!
//! Peers push one [`Observation`] per value they accept for the first time.
//! A single [`ConvergenceCounter`] drains those events in arrival order and
//! owns the tally exclusively; nothing else reads or writes it.
//!
//! A value is committed on the step where its tally becomes exactly the
//! configured peer count N. The check is an equality, not a threshold. The
//! mesh runs N + 1 endpoints, so the last one to hear a value pushes the
//! tally to N + 1, and that step never re-signals commit.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::population::PeerId;
use crate::Value;

/// A peer saw a value for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub peer: PeerId,
    pub value: Value,
}

/// Tally after one observation was counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub value: Value,
    pub count: usize,
    /// True only on the step that brought `count` to N.
    pub committed: bool,
}

/// Channel peers use to report first observations.
pub fn observation_channel() -> (UnboundedSender<Observation>, UnboundedReceiver<Observation>) {
    mpsc::unbounded_channel()
}

/// Sole owner of the per-value tally.
pub struct ConvergenceCounter {
    peers: usize,
    tally: HashMap<Value, usize>,
    reports: Option<UnboundedSender<Report>>,
}

impl ConvergenceCounter {
    /// A counter that commits a value once `peers` (N) endpoints saw it.
    pub fn new(peers: usize) -> Self {
        Self {
            peers,
            tally: HashMap::new(),
            reports: None,
        }
    }

    /// Also publish every report on `reports`.
    #[must_use]
    pub fn with_reports(mut self, reports: UnboundedSender<Report>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Current tally for `value`.
    pub fn count(&self, value: Value) -> usize {
        self.tally.get(&value).copied().unwrap_or(0)
    }

    /// Count one observation.
    pub fn record(&mut self, observation: Observation) -> Report {
        let Observation { peer, value } = observation;
        let count = self.tally.entry(value).or_insert(0);
        *count += 1;

        let report = Report {
            value,
            count: *count,
            committed: *count == self.peers,
        };

        if report.committed {
            info!(%peer, "Committed version {} → count = {}", value, report.count);
        } else {
            info!(%peer, "Received for {} → count = {}", value, report.count);
        }

        if let Some(reports) = &self.reports {
            if reports.send(report).is_err() {
                debug!("report subscriber dropped");
                self.reports = None;
            }
        }

        report
    }

    /// Drain observations until every sender is gone.
    pub async fn run(mut self, mut observations: UnboundedReceiver<Observation>) {
        while let Some(observation) = observations.recv().await {
            self.record(observation);
        }
        info!("All peers stopped reporting; convergence counter exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seen(peer: usize, value: Value) -> Observation {
        Observation {
            peer: PeerId(peer),
            value,
        }
    }

    #[test]
    fn commits_once_on_reaching_n() {
        let mut counter = ConvergenceCounter::new(3);

        let reports: Vec<_> = (0..3).map(|p| counter.record(seen(p, 1))).collect();

        assert_eq!(
            reports,
            vec![
                Report { value: 1, count: 1, committed: false },
                Report { value: 1, count: 2, committed: false },
                Report { value: 1, count: 3, committed: true },
            ]
        );
        assert_eq!(counter.count(1), 3);
        assert_eq!(counter.count(2), 0);
    }

    #[test]
    fn values_are_tallied_independently() {
        let mut counter = ConvergenceCounter::new(2);

        counter.record(seen(0, 1));
        counter.record(seen(0, 2));
        let second = counter.record(seen(1, 2));

        assert!(second.committed);
        assert_eq!(counter.count(1), 1);
        assert_eq!(counter.count(2), 2);
    }

    #[test]
    fn overshoot_does_not_recommit() {
        let mut counter = ConvergenceCounter::new(2);

        let flags: Vec<_> = (0..4).map(|p| counter.record(seen(p, 9)).committed).collect();

        assert_eq!(flags, vec![false, true, false, false]);
    }

    #[test]
    fn same_peer_is_counted_again() {
        // Dedup is the peer's job; the counter trusts its input.
        let mut counter = ConvergenceCounter::new(2);

        counter.record(seen(0, 1));
        assert!(counter.record(seen(0, 1)).committed);
    }

    #[tokio::test]
    async fn run_publishes_reports_in_arrival_order() {
        let (tx, rx) = observation_channel();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        let counter = ConvergenceCounter::new(2).with_reports(report_tx);

        tx.send(seen(0, 1)).unwrap();
        tx.send(seen(0, 2)).unwrap();
        tx.send(seen(1, 1)).unwrap();
        drop(tx);
        counter.run(rx).await;

        let mut reports = Vec::new();
        while let Some(report) = report_rx.recv().await {
            reports.push((report.value, report.count, report.committed));
        }
        assert_eq!(reports, vec![(1, 1, false), (2, 1, false), (1, 2, true)]);
    }

    proptest! {
        #[test]
        fn tally_is_monotone_and_commits_once(
            values in proptest::collection::vec(0i64..5, 0..200),
            population in 1usize..10,
        ) {
            let mut counter = ConvergenceCounter::new(population);
            let mut last: HashMap<Value, usize> = HashMap::new();
            let mut commits: HashMap<Value, usize> = HashMap::new();

            for (peer, value) in values.iter().enumerate() {
                let report = counter.record(seen(peer, *value));
                let previous = last.insert(*value, report.count).unwrap_or(0);
                prop_assert_eq!(report.count, previous + 1);
                if report.committed {
                    prop_assert_eq!(report.count, population);
                    *commits.entry(*value).or_default() += 1;
                }
            }

            for (value, count) in &last {
                let expected = usize::from(*count >= population);
                prop_assert_eq!(commits.get(value).copied().unwrap_or(0), expected);
            }
        }
    }
}
