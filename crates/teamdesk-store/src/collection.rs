//! In-memory collection with realtime snapshot subscriptions
//!
//! Documents live in a `DashMap` keyed by id. Every successful write
//! publishes a freshly ordered snapshot on a `watch` channel, so subscribers
//! always see the latest full state and never a diff.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use teamdesk_core::error::DomainError;
use teamdesk_core::traits::{Record, RepoResult, Repository, SnapshotReceiver, SortDirection};

struct Stored<T> {
    /// Insertion sequence; breaks order-key ties in fetch order
    seq: u64,
    record: T,
}

/// Pending injected write failures
#[derive(Debug)]
struct FailurePlan {
    remaining: usize,
    message: String,
}

/// One document collection
pub struct MemoryCollection<T: Record> {
    docs: DashMap<T::Id, Stored<T>>,
    next_seq: AtomicU64,
    sender: watch::Sender<Arc<Vec<T>>>,
    /// Serializes snapshot publication so snapshots never go backwards
    publish_lock: Mutex<()>,
    failures: Mutex<Option<FailurePlan>>,
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            docs: DashMap::new(),
            next_seq: AtomicU64::new(0),
            sender,
            publish_lock: Mutex::new(()),
            failures: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Make the next `count` writes fail with a store error
    pub fn fail_next_writes(&self, count: usize, message: impl Into<String>) {
        *self.failures.lock() = (count > 0).then(|| FailurePlan {
            remaining: count,
            message: message.into(),
        });
    }

    /// Insert records without failure injection, publishing once
    pub fn seed(&self, records: impl IntoIterator<Item = T>) {
        for mut record in records {
            if record.needs_id() {
                record.assign_id(new_document_id());
            }
            self.put(record);
        }
        self.publish();
    }

    fn take_failure(&self) -> RepoResult<()> {
        let mut guard = self.failures.lock();
        let Some(plan) = guard.as_mut() else {
            return Ok(());
        };

        plan.remaining -= 1;
        let message = plan.message.clone();
        if plan.remaining == 0 {
            *guard = None;
        }
        warn!(collection = T::COLLECTION, error = %message, "Injected write failure");
        Err(DomainError::StoreError(message))
    }

    fn put(&self, record: T) {
        let id = record.id().clone();
        let seq = match self.docs.get(&id) {
            Some(existing) => existing.seq,
            None => self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.docs.insert(id, Stored { seq, record });
    }

    fn ordered(&self) -> Vec<T> {
        let mut entries: Vec<(u64, T)> = self
            .docs
            .iter()
            .map(|entry| (entry.seq, entry.record.clone()))
            .collect();

        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            let by_key = match T::DIRECTION {
                SortDirection::Ascending => a.order_key().cmp(&b.order_key()),
                SortDirection::Descending => b.order_key().cmp(&a.order_key()),
            };
            match by_key {
                CmpOrdering::Equal => seq_a.cmp(seq_b),
                other => other,
            }
        });

        entries.into_iter().map(|(_, record)| record).collect()
    }

    fn publish(&self) {
        let _guard = self.publish_lock.lock();
        let snapshot = self.ordered();
        debug!(
            collection = T::COLLECTION,
            size = snapshot.len(),
            "Publishing snapshot"
        );
        self.sender.send_replace(Arc::new(snapshot));
    }
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryCollection<T> {
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_by_id(&self, id: &T::Id) -> RepoResult<Option<T>> {
        Ok(self.docs.get(id).map(|entry| entry.record.clone()))
    }

    async fn snapshot(&self) -> RepoResult<Vec<T>> {
        Ok(self.ordered())
    }

    #[instrument(skip(self, record), fields(collection = T::COLLECTION))]
    async fn create(&self, mut record: T) -> RepoResult<T> {
        self.take_failure()?;

        if record.needs_id() {
            record.assign_id(new_document_id());
        }
        self.put(record.clone());
        self.publish();

        debug!(id = %record.id(), "Document created");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(collection = T::COLLECTION, id = %record.id()))]
    async fn update(&self, record: &T) -> RepoResult<()> {
        self.take_failure()?;

        if !self.docs.contains_key(record.id()) {
            return Err(DomainError::RecordNotFound {
                collection: T::COLLECTION,
                id: record.id().to_string(),
            });
        }
        self.put(record.clone());
        self.publish();
        Ok(())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: &T::Id) -> RepoResult<()> {
        self.take_failure()?;

        if self.docs.remove(id).is_some() {
            self.publish();
            debug!(id = %id, "Document deleted");
        }
        Ok(())
    }

    fn subscribe(&self) -> SnapshotReceiver<T> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use teamdesk_core::{DocumentId, Priority, Task, TaskHistoryEntry, TaskAction, UserId};

    fn task(title: &str, due_in_days: i64) -> Task {
        Task::new(
            title.to_string(),
            String::new(),
            Utc::now() + Duration::days(due_in_days),
            Priority::Medium,
            Vec::new(),
            UserId::from("admin"),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_publishes() {
        let tasks = MemoryCollection::<Task>::new();
        let mut rx = tasks.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let created = tasks.create(task("a", 1)).await.unwrap();
        assert!(!created.id.is_unassigned());

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, created.id);
    }

    #[tokio::test]
    async fn test_snapshot_order_ascending_with_stable_ties() {
        let tasks = MemoryCollection::<Task>::new();
        let same_due = Utc::now() + Duration::days(2);

        let mut first = task("first", 0);
        first.due_date = same_due;
        let mut second = task("second", 0);
        second.due_date = same_due;

        tasks.create(task("later", 5)).await.unwrap();
        tasks.create(first).await.unwrap();
        tasks.create(second).await.unwrap();
        tasks.create(task("soon", 1)).await.unwrap();

        let titles: Vec<String> = tasks
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["soon", "first", "second", "later"]);
    }

    #[tokio::test]
    async fn test_descending_collection() {
        let history = MemoryCollection::<TaskHistoryEntry>::new();
        for (offset, title) in [(3, "old"), (1, "new"), (2, "mid")] {
            let mut entry = TaskHistoryEntry::new(
                DocumentId::from("t"),
                UserId::from("u"),
                "U".to_string(),
                TaskAction::Completed,
                title.to_string(),
            );
            entry.timestamp = Utc::now() - Duration::hours(offset);
            history.create(entry).await.unwrap();
        }
        let titles: Vec<String> = history
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.task_title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let tasks = MemoryCollection::<Task>::new();
        let mut ghost = task("ghost", 1);
        ghost.id = DocumentId::from("nope");

        let err = tasks.update(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let tasks = MemoryCollection::<Task>::new();
        tasks.delete(&DocumentId::from("nope")).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_tie_position() {
        let tasks = MemoryCollection::<Task>::new();
        let due = Utc::now() + Duration::days(1);
        let mut a = task("a", 0);
        a.due_date = due;
        let mut b = task("b", 0);
        b.due_date = due;
        let a = tasks.create(a).await.unwrap();
        tasks.create(b).await.unwrap();

        let mut renamed = a.clone();
        renamed.title = "a2".to_string();
        tasks.update(&renamed).await.unwrap();

        let snapshot = tasks.snapshot().await.unwrap();
        assert_eq!(snapshot[0].title, "a2");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let tasks = MemoryCollection::<Task>::new();
        tasks.fail_next_writes(1, "quota exceeded");

        let err = tasks.create(task("x", 1)).await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(tasks.is_empty());

        tasks.create(task("x", 1)).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_publishes_once() {
        let tasks = MemoryCollection::<Task>::new();
        let mut rx = tasks.subscribe();
        rx.borrow_and_update();

        tasks.seed(vec![task("a", 1), task("b", 2)]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
        assert!(!rx.has_changed().unwrap());
    }
}
