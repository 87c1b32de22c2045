//! Owns the [`SupplyState`] and drives acquisition cycles on a timer.
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::core::acquisition::Acquirer;
use crate::core::state::SupplyState;

/// Explicit teardown signal shared between the tracker and its owner.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        CancelToken { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The new state was published
    Applied,
    /// Another cycle was still in flight
    Skipped,
    /// Cancelled before the result could be written
    Discarded,
}

pub struct SupplyTracker {
    acquirer: Acquirer,
    state: watch::Sender<SupplyState>,
    in_flight: Mutex<()>,
    cancel: CancelToken,
    interval: Duration,
}

impl SupplyTracker {
    pub fn new(acquirer: Acquirer, interval: Duration) -> Self {
        let (state, _rx) = watch::channel(SupplyState::default());
        SupplyTracker {
            acquirer,
            state,
            in_flight: Mutex::new(()),
            cancel: CancelToken::new(),
            interval,
        }
    }

    /// Handle for readers; always observes the last fully written state.
    pub fn subscribe(&self) -> watch::Receiver<SupplyState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SupplyState {
        self.state.borrow().clone()
    }

    pub fn shutdown(&self) {
        info!("Stopping supply tracker");
        self.cancel.cancel();
    }

    /// Runs one acquisition cycle unless one is already running.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Previous cycle still in flight, skipping");
            return CycleOutcome::Skipped;
        };
        if self.cancel.is_cancelled() {
            return CycleOutcome::Discarded;
        }

        let previous = self.snapshot();
        let next = self.acquirer.acquire(&previous, Utc::now()).await;

        if self.cancel.is_cancelled() {
            debug!("Tracker cancelled during cycle, discarding result");
            return CycleOutcome::Discarded;
        }
        self.state.send_replace(next);
        CycleOutcome::Applied
    }

    /// Starts the polling loop: one cycle immediately, then one per interval
    /// until the cancel token fires.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval = ?self.interval, "Supply tracker started");

            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    outcome = self.run_cycle() => debug!(?outcome, "Cycle finished"),
                }
            }
            debug!("Supply tracker loop exited");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::acquisition::test_utils::MockSources;

    #[tokio::test]
    async fn test_run_cycle_publishes_state() {
        let tracker = SupplyTracker::new(
            MockSources::healthy().acquirer(),
            Duration::from_secs(60),
        );
        let mut rx = tracker.subscribe();
        assert!(!tracker.snapshot().is_loaded());

        assert_eq!(tracker.run_cycle().await, CycleOutcome::Applied);

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.circulating_supply, 19_790_000.0);
        assert!(state.is_loaded());
        assert_eq!(tracker.snapshot(), state);
    }

    #[tokio::test]
    async fn test_overlapping_cycle_is_skipped() {
        let sources = MockSources {
            delay: Some(Duration::from_millis(200)),
            ..MockSources::healthy()
        };
        let tracker = Arc::new(SupplyTracker::new(
            sources.acquirer(),
            Duration::from_secs(60),
        ));

        let first = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.run_cycle().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(tracker.run_cycle().await, CycleOutcome::Skipped);
        assert_eq!(first.await.unwrap(), CycleOutcome::Applied);
        assert_eq!(sources.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_cycle_result_is_discarded() {
        let sources = MockSources {
            delay: Some(Duration::from_millis(200)),
            ..MockSources::healthy()
        };
        let tracker = Arc::new(SupplyTracker::new(
            sources.acquirer(),
            Duration::from_secs(60),
        ));

        let cycle = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.run_cycle().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        tracker.shutdown();

        assert_eq!(cycle.await.unwrap(), CycleOutcome::Discarded);
        assert!(!tracker.snapshot().is_loaded());
        assert_eq!(tracker.run_cycle().await, CycleOutcome::Discarded);
        assert_eq!(sources.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_polls_on_interval() {
        let sources = MockSources::healthy();
        let tracker = Arc::new(SupplyTracker::new(
            sources.acquirer(),
            Duration::from_secs(60),
        ));
        let mut rx = tracker.subscribe();

        let handle = Arc::clone(&tracker).spawn();

        rx.changed().await.unwrap();
        assert_eq!(sources.calls(), 1);

        rx.changed().await.unwrap();
        assert_eq!(sources.calls(), 2);

        tracker.shutdown();
        handle.await.unwrap();
        assert_eq!(tracker.run_cycle().await, CycleOutcome::Discarded);
    }

    #[tokio::test]
    async fn test_cancel_token_wakes_waiters() {
        let token = CancelToken::new();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });

        assert!(!token.is_cancelled());
        token.cancel();
        waiter.await.unwrap();
        assert!(token.is_cancelled());
    }
}
