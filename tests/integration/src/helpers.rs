//! Test helpers for integration tests
//!
//! Provides a fully wired in-memory world, user switching and a running
//! dashboard session whose notifications can be awaited.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use teamdesk_core::engine::calendar::utc_offset;
use teamdesk_core::engine::StatsScope;
use teamdesk_core::{Notification, Repository, UserId, UserProfile};
use teamdesk_service::{DashboardSession, ServiceContext};
use teamdesk_store::{MemoryExportSink, MemoryIdentityProvider, MemoryStore};

/// How long a test waits for a pushed notification
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(2);

/// In-memory store, identity provider, export sink and the context over them
pub struct TestWorld {
    pub store: MemoryStore,
    pub identity: Arc<MemoryIdentityProvider>,
    pub sink: Arc<MemoryExportSink>,
    pub ctx: ServiceContext,
}

impl TestWorld {
    /// Build an empty world with default policies
    pub fn new() -> Result<Self> {
        let store = MemoryStore::new();
        let identity = Arc::new(MemoryIdentityProvider::new());
        let sink = Arc::new(MemoryExportSink::new());

        let ctx = ServiceContext::builder()
            .user_repo(store.users.clone())
            .task_repo(store.tasks.clone())
            .task_history_repo(store.task_history.clone())
            .login_history_repo(store.login_history.clone())
            .tracker_repo(store.trackers.clone())
            .tracker_task_repo(store.tracker_tasks.clone())
            .tracker_history_repo(store.tracker_history.clone())
            .attendance_repo(store.attendance.clone())
            .identity(identity.clone())
            .export_sink(sink.clone())
            .build()?;

        Ok(Self {
            store,
            identity,
            sink,
            ctx,
        })
    }

    /// Store a profile and register a verified account for it
    pub fn add(&self, profile: UserProfile) -> UserProfile {
        self.identity.register(
            profile.uid.clone(),
            profile.email.clone(),
            profile.name.clone(),
            profile.role,
            true,
        );
        self.store.users.seed(vec![profile.clone()]);
        profile
    }

    /// Store a profile and sign it in
    pub fn sign_in(&self, profile: UserProfile) -> Result<UserProfile> {
        let profile = self.add(profile);
        self.identity.sign_in(&profile.uid)?;
        Ok(profile)
    }

    /// Switch to an already registered user
    pub fn switch_to(&self, uid: &str) -> Result<()> {
        self.identity.sign_in(&UserId::from(uid))?;
        Ok(())
    }

    /// Start a dashboard session for `uid` on the live collections
    pub fn start_session(&self, uid: &str, scope: StatsScope) -> SessionHandle {
        let session = DashboardSession::new(UserId::from(uid), scope, utc_offset());
        let (notify_tx, notifications) = mpsc::channel(64);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(session.run(
            self.store.tasks.subscribe(),
            self.store.tracker_tasks.subscribe(),
            notify_tx,
            shutdown_rx,
        ));

        SessionHandle {
            notifications,
            shutdown,
            handle,
        }
    }
}

/// A running dashboard session
pub struct SessionHandle {
    notifications: mpsc::Receiver<Notification>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SessionHandle {
    /// Wait for the next notification matching `predicate`, skipping others
    pub async fn expect<F>(&mut self, predicate: F) -> Result<Notification>
    where
        F: Fn(&Notification) -> bool,
    {
        loop {
            let next = tokio::time::timeout(NOTIFICATION_TIMEOUT, self.notifications.recv())
                .await
                .map_err(|_| anyhow!("no matching notification"))?
                .ok_or_else(|| anyhow!("session ended"))?;
            if predicate(&next) {
                return Ok(next);
            }
        }
    }

    /// Everything already delivered, without waiting
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    /// Give the session a moment to process pushed snapshots
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    /// Stop the session and wait for it to exit
    pub async fn stop(self) -> Result<()> {
        self.shutdown.send(true)?;
        self.handle.await?;
        Ok(())
    }
}
