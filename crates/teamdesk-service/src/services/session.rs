//! Dashboard session
//!
//! Consumes realtime task and tracker-task snapshots for one user and
//! emits notifications. Every notified set lives on the session and is
//! dropped with it.

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use teamdesk_core::engine::{
    task_stats, urgent_tasks, CelebrationTracker, MilestoneTracker, StatsScope, UrgencyNotifier,
};
use teamdesk_core::events::{
    MilestoneReachedEvent, StatsUpdatedEvent, TrackerCompletedEvent, UrgentTasksEvent,
};
use teamdesk_core::{Notification, SnapshotReceiver, Task, TrackerTask, UserId};

use super::permission::Actor;

/// Session-scoped derivation state for one signed-in user
#[derive(Debug)]
pub struct DashboardSession {
    user_id: UserId,
    scope: StatsScope,
    urgency: UrgencyNotifier,
    celebrations: CelebrationTracker,
    milestones: MilestoneTracker,
}

impl DashboardSession {
    pub fn new(user_id: UserId, scope: StatsScope, offset: FixedOffset) -> Self {
        Self {
            user_id,
            scope,
            urgency: UrgencyNotifier::new(),
            celebrations: CelebrationTracker::new(),
            milestones: MilestoneTracker::new(offset),
        }
    }

    /// Session for the resolved actor; admins get the global scope
    pub fn for_actor(actor: &Actor, offset: FixedOffset) -> Self {
        Self::new(actor.id().clone(), actor.stats_scope(), offset)
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Re-derive from a task snapshot
    ///
    /// Always yields refreshed stats, then at most one urgency notice,
    /// then any milestones reached.
    pub fn on_tasks(&mut self, tasks: &[Task], now: DateTime<Utc>) -> Vec<Notification> {
        let mut notifications = vec![Notification::StatsUpdated(StatsUpdatedEvent::new(
            task_stats(tasks, &self.scope, now),
        ))];

        let urgent = urgent_tasks(tasks, &self.user_id);
        if let Some(notice) = self.urgency.observe(&urgent) {
            notifications.push(Notification::UrgentTasks(UrgentTasksEvent::new(
                self.user_id.clone(),
                notice,
            )));
        }

        notifications.extend(
            self.milestones
                .observe(tasks, &self.user_id, now)
                .into_iter()
                .map(|milestone| {
                    Notification::MilestoneReached(MilestoneReachedEvent::new(
                        self.user_id.clone(),
                        milestone,
                    ))
                }),
        );

        notifications
    }

    /// Re-derive from a tracker-task snapshot
    pub fn on_tracker_tasks(&mut self, tasks: &[TrackerTask]) -> Vec<Notification> {
        self.celebrations
            .observe_snapshot(tasks)
            .into_iter()
            .map(|tracker_id| Notification::TrackerCompleted(TrackerCompletedEvent::new(tracker_id)))
            .collect()
    }

    /// Drive the session until shutdown or until a channel closes
    ///
    /// The current value of each channel is processed first.
    pub async fn run(
        mut self,
        mut tasks_rx: SnapshotReceiver<Task>,
        mut tracker_rx: SnapshotReceiver<TrackerTask>,
        notify_tx: mpsc::Sender<Notification>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(user_id = %self.user_id, "Dashboard session started");

        let tasks = tasks_rx.borrow_and_update().clone();
        let mut pending = self.on_tasks(&tasks, Utc::now());
        let tracker_tasks = tracker_rx.borrow_and_update().clone();
        pending.extend(self.on_tracker_tasks(&tracker_tasks));

        loop {
            for notification in pending.drain(..) {
                debug!(event_type = notification.event_type(), "Notification emitted");
                if notify_tx.send(notification).await.is_err() {
                    warn!(user_id = %self.user_id, "Notification receiver dropped");
                    return;
                }
            }

            tokio::select! {
                changed = tasks_rx.changed() => {
                    if changed.is_err() {
                        warn!("Task snapshot channel closed");
                        break;
                    }
                    let tasks = tasks_rx.borrow_and_update().clone();
                    pending = self.on_tasks(&tasks, Utc::now());
                }
                changed = tracker_rx.changed() => {
                    if changed.is_err() {
                        warn!("Tracker task snapshot channel closed");
                        break;
                    }
                    let tracker_tasks = tracker_rx.borrow_and_update().clone();
                    pending = self.on_tracker_tasks(&tracker_tasks);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(user_id = %self.user_id, "Dashboard session stopped");
    }
}
