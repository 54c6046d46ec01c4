//! The voting session: one voter's connection to the shared vote.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use votehub_core::config::AppConfig;
use votehub_core::result::AppResult;
use votehub_core::traits::guard::{GuardedAction, InputGuard};
use votehub_core::traits::store::SyncStore;
use votehub_core::types::time::{EpochMillis, now_millis};
use votehub_entity::{Ballot, Catalog, ItemKey, Notification, NotificationKind, SubmissionEntry};
use votehub_store::paths;

use super::sync::spawn_mirror;
use crate::aggregate::{Aggregator, RankedItem, Standings};
use crate::feed::activity::ActivityFeed;
use crate::feed::messages;
use crate::ledger::vote_ledger::{ToggleOutcome, VoteLedger};
use crate::message::types::SessionUpdate;
use crate::presence::heartbeat::HeartbeatTask;
use crate::presence::tracker::PresenceTracker;
use crate::submission::store::SubmissionStore;

/// An open session for one voter.
///
/// Opening a session subscribes to the four store roots, starts the
/// presence heartbeat and announces the voter. [`VotingSession::close`]
/// tears all of it down; dropping an open session cancels the background
/// work without waiting for it.
#[derive(Debug)]
pub struct VotingSession {
    voter: String,
    /// Activity at or before this time is history, not news.
    joined_at: EpochMillis,
    catalog: Arc<Catalog>,
    guard: Arc<dyn InputGuard>,
    ledger: Arc<VoteLedger>,
    submissions: Arc<SubmissionStore>,
    presence: Arc<PresenceTracker>,
    feed: Arc<ActivityFeed>,
    updates: broadcast::Sender<SessionUpdate>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    heartbeat: Option<HeartbeatTask>,
    heartbeat_interval: Duration,
}

impl VotingSession {
    /// Open a session for the voter named `voter`.
    pub async fn open(
        store: Arc<dyn SyncStore>,
        guard: Arc<dyn InputGuard>,
        catalog: Arc<Catalog>,
        config: &AppConfig,
        voter: &str,
    ) -> AppResult<Self> {
        let voter = guard.voter_name(voter)?;
        let joined_at = now_millis();

        let ledger = Arc::new(VoteLedger::new(store.clone()));
        let submissions = Arc::new(SubmissionStore::new(store.clone(), catalog.clone()));
        let presence = Arc::new(PresenceTracker::new(store.clone(), &config.presence));
        let feed = Arc::new(ActivityFeed::new(store.clone(), &config.feed));
        let (updates, _) = broadcast::channel(config.store.channel_buffer_size.max(1));
        let cancel = CancellationToken::new();

        let mut tasks = Vec::with_capacity(4);

        let rx = store.subscribe(&paths::votes()).await?;
        tasks.push(spawn_mirror(paths::votes(), rx, cancel.clone(), {
            let ledger = ledger.clone();
            let updates = updates.clone();
            move |value: &Value| {
                ledger.apply_snapshot(value)?;
                let voters = ledger.snapshot().len();
                let _ = updates.send(SessionUpdate::LedgerChanged { voters });
                Ok(())
            }
        }));

        let rx = store.subscribe(&paths::submissions()).await?;
        tasks.push(spawn_mirror(paths::submissions(), rx, cancel.clone(), {
            let submissions = submissions.clone();
            let updates = updates.clone();
            move |value: &Value| {
                submissions.apply_snapshot(value)?;
                let total = submissions.total();
                let _ = updates.send(SessionUpdate::SubmissionsChanged { total });
                Ok(())
            }
        }));

        let rx = store.subscribe(&paths::active_users()).await?;
        tasks.push(spawn_mirror(paths::active_users(), rx, cancel.clone(), {
            let presence = presence.clone();
            let updates = updates.clone();
            move |value: &Value| {
                presence.apply_snapshot(value)?;
                let live = presence.live_users(now_millis()).len();
                let _ = updates.send(SessionUpdate::PresenceChanged { live });
                Ok(())
            }
        }));

        let rx = store.subscribe(&paths::notifications()).await?;
        tasks.push(spawn_mirror(paths::notifications(), rx, cancel.clone(), {
            let feed = feed.clone();
            let updates = updates.clone();
            let celebrated = AtomicI64::new(joined_at);
            move |value: &Value| {
                feed.apply_snapshot(value)?;
                let recent = feed.recent(joined_at).len();
                let _ = updates.send(SessionUpdate::ActivityChanged { recent });

                let mut fresh = feed.celebrations(now_millis());
                fresh.retain(|n| n.timestamp > celebrated.load(Ordering::SeqCst));
                fresh.reverse();
                for notification in fresh {
                    celebrated.fetch_max(notification.timestamp, Ordering::SeqCst);
                    let _ = updates.send(SessionUpdate::Celebrate { notification });
                }
                Ok(())
            }
        }));

        let heartbeat_interval = config.presence.heartbeat_interval();
        let heartbeat = HeartbeatTask::start(presence.clone(), &voter, heartbeat_interval).await;

        let session = Self {
            voter,
            joined_at,
            catalog,
            guard,
            ledger,
            submissions,
            presence,
            feed,
            updates,
            cancel,
            tasks,
            heartbeat: Some(heartbeat),
            heartbeat_interval,
        };

        session
            .announce(messages::joined(&session.voter), NotificationKind::User)
            .await;
        info!(voter = %session.voter, "Voting session opened");
        Ok(session)
    }

    /// The voter this session acts for.
    pub fn voter(&self) -> &str {
        &self.voter
    }

    /// When the session was opened.
    pub fn joined_at(&self) -> EpochMillis {
        self.joined_at
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The vote ledger mirror.
    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// The submissions mirror.
    pub fn submissions(&self) -> &SubmissionStore {
        &self.submissions
    }

    /// The presence mirror.
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// The activity mirror.
    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// The running heartbeat.
    pub fn heartbeat(&self) -> Option<&HeartbeatTask> {
        self.heartbeat.as_ref()
    }

    /// Subscribe to updates of this session's local view.
    pub fn updates(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    /// Toggle the session voter's selection of `item_key`.
    ///
    /// Casting a vote also publishes a `vote` event; if that publish fails
    /// the vote still stands.
    pub async fn toggle_vote(&self, item_key: &ItemKey) -> AppResult<ToggleOutcome> {
        self.catalog.require(item_key.category_id())?;
        self.guard.admit(GuardedAction::Vote, &self.voter)?;

        let outcome = self.ledger.toggle_vote(&self.voter, item_key).await?;
        if outcome.cast {
            self.announce(messages::voted(&self.voter, item_key), NotificationKind::Vote)
                .await;
        }
        Ok(outcome)
    }

    /// Submit a new item to a category.
    ///
    /// An empty or missing `submitter` falls back to the session voter.
    pub async fn submit(
        &self,
        category_id: &str,
        name: &str,
        submitter: Option<&str>,
    ) -> AppResult<SubmissionEntry> {
        let name = self.guard.submission_name(name)?;
        let submitter = match submitter.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => self.guard.voter_name(raw)?,
            None => self.voter.clone(),
        };
        self.catalog.require(category_id)?;
        self.guard.admit(GuardedAction::Submission, &self.voter)?;

        let entry = self.submissions.submit(category_id, &name, &submitter).await?;
        self.announce(
            messages::submitted(&submitter, &name),
            NotificationKind::Submission,
        )
        .await;
        Ok(entry)
    }

    /// Withdraw a submission made by the session voter.
    pub async fn withdraw(&self, category_id: &str, entry_id: &str) -> AppResult<SubmissionEntry> {
        self.submissions
            .withdraw(category_id, entry_id, &self.voter)
            .await
    }

    /// The session voter's ballot.
    pub fn ballot(&self) -> Ballot {
        self.ledger.get_ballot(&self.voter)
    }

    /// Sanitized identities of voters seen recently.
    pub fn live_users(&self) -> BTreeSet<String> {
        self.presence.live_users(now_millis())
    }

    /// Activity since the session was opened, newest first.
    pub fn recent_activity(&self) -> Vec<Notification> {
        self.feed.recent(self.joined_at)
    }

    /// Run `f` over an aggregator built from the current mirrors.
    pub fn with_aggregator<R>(&self, f: impl FnOnce(&Aggregator<'_>) -> R) -> R {
        let ledger = self.ledger.snapshot();
        let submissions = self.submissions.snapshot();
        let aggregator = Aggregator::new(&ledger, &self.catalog, &submissions);
        f(&aggregator)
    }

    /// Headline numbers for the whole vote.
    pub fn standings(&self) -> Standings {
        let live = self.live_users().len();
        self.with_aggregator(|agg| agg.standings(live))
    }

    /// A category's items ranked by support.
    pub fn ranking(&self, category_id: &str) -> AppResult<Vec<RankedItem>> {
        self.with_aggregator(|agg| agg.ranked_items(category_id))
    }

    /// Act for another voter: the old heartbeat stops before the new one
    /// starts.
    pub async fn switch_voter(&mut self, voter: &str) -> AppResult<()> {
        let voter = self.guard.voter_name(voter)?;
        if voter == self.voter {
            return Ok(());
        }

        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.stop().await;
        }
        info!(from = %self.voter, to = %voter, "Switching voter");
        self.voter = voter;
        self.heartbeat = Some(
            HeartbeatTask::start(self.presence.clone(), &self.voter, self.heartbeat_interval)
                .await,
        );

        let _ = self.updates.send(SessionUpdate::VoterChanged {
            voter: self.voter.clone(),
        });
        self.announce(messages::joined(&self.voter), NotificationKind::User)
            .await;
        Ok(())
    }

    /// Stop the heartbeat and every subscription, then wait for them.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.stop().await;
        }
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                warn!(error = %e, "Mirror task ended abnormally");
            }
        }
        info!(voter = %self.voter, "Voting session closed");
    }

    /// Publish an activity event; failures are logged and swallowed.
    async fn announce(&self, message: String, kind: NotificationKind) {
        let published: AppResult<Notification> = async {
            let message = self.guard.message(&message)?;
            self.guard.admit(GuardedAction::Notification, &self.voter)?;
            self.feed.publish(&message, kind).await
        }
        .await;

        if let Err(e) = published {
            warn!(voter = %self.voter, kind = %kind, error = %e, "Activity event not published");
        }
    }
}

impl Drop for VotingSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
