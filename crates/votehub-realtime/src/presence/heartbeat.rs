//! Repeating presence heartbeat owned by a session.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::tracker::PresenceTracker;

/// A running heartbeat for one voter.
///
/// [`HeartbeatTask::stop`] consumes the task, so it can only be stopped
/// once. Dropping a task that was never stopped cancels it as well.
#[derive(Debug)]
pub struct HeartbeatTask {
    voter: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    beats: Arc<AtomicU64>,
}

impl HeartbeatTask {
    /// Send one heartbeat now, then keep sending one every `period`.
    ///
    /// A failed first heartbeat is logged; the task still starts. Later
    /// beats are due at whole periods from the call, not from when the
    /// background task first gets polled.
    pub async fn start(tracker: Arc<PresenceTracker>, voter: &str, period: Duration) -> Self {
        let first = Instant::now() + period;
        let beats = Arc::new(AtomicU64::new(0));
        match tracker.heartbeat(voter).await {
            Ok(_) => {
                beats.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => warn!(voter, error = %e, "Initial heartbeat failed"),
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_heartbeat(
            tracker,
            voter.to_string(),
            first,
            period,
            cancel.clone(),
            beats.clone(),
        ));

        info!(voter, period = ?period, "Heartbeat started");
        Self {
            voter: voter.to_string(),
            cancel,
            handle: Some(handle),
            beats,
        }
    }

    /// The voter this heartbeat is for.
    pub fn voter(&self) -> &str {
        &self.voter
    }

    /// Successful heartbeats so far.
    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::SeqCst)
    }

    /// Stop the heartbeat and wait for the loop to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(voter = %self.voter, error = %e, "Heartbeat task ended abnormally");
            }
        }
        info!(voter = %self.voter, beats = self.beats(), "Heartbeat stopped");
    }
}

impl Drop for HeartbeatTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
            debug!(voter = %self.voter, "Heartbeat cancelled on drop");
        }
    }
}

async fn run_heartbeat(
    tracker: Arc<PresenceTracker>,
    voter: String,
    first: Instant,
    period: Duration,
    cancel: CancellationToken,
    beats: Arc<AtomicU64>,
) {
    let mut interval = time::interval_at(first, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        match tracker.heartbeat(&voter).await {
            Ok(_) => {
                beats.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => warn!(voter = %voter, error = %e, "Heartbeat failed"),
        }
    }

    debug!(voter = %voter, "Heartbeat loop ended");
}
