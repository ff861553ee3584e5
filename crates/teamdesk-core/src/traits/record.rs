//! Record trait - how each entity maps onto a store collection

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entities::{
    AttendanceRecord, LoginHistoryEntry, MinuteTracker, Task, TaskHistoryEntry,
    TrackerHistoryEntry, TrackerTask, UserProfile,
};
use crate::value_objects::{DocumentId, UserId};

/// Direction a collection subscription is ordered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An entity stored as a document in a named collection
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection name in the document store
    const COLLECTION: &'static str;
    /// Direction of the subscription order
    const DIRECTION: SortDirection;

    type Id: Clone + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static;
    type Key: Ord;

    fn id(&self) -> &Self::Id;

    /// True when the store must issue an id on create
    fn needs_id(&self) -> bool;

    fn assign_id(&mut self, id: String);

    /// Field the collection subscription is ordered by
    fn order_key(&self) -> Self::Key;
}

macro_rules! document_record {
    ($ty:ty, $collection:literal, $direction:ident, $key:ty, $field:ident) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;
            const DIRECTION: SortDirection = SortDirection::$direction;

            type Id = DocumentId;
            type Key = $key;

            fn id(&self) -> &DocumentId {
                &self.id
            }

            fn needs_id(&self) -> bool {
                self.id.is_unassigned()
            }

            fn assign_id(&mut self, id: String) {
                self.id = DocumentId::new(id);
            }

            fn order_key(&self) -> $key {
                self.$field
            }
        }
    };
}

document_record!(Task, "tasks", Ascending, DateTime<Utc>, due_date);
document_record!(TaskHistoryEntry, "taskHistory", Descending, DateTime<Utc>, timestamp);
document_record!(LoginHistoryEntry, "loginHistory", Descending, DateTime<Utc>, login_time);
document_record!(MinuteTracker, "minuteTrackers", Descending, DateTime<Utc>, date);
document_record!(TrackerTask, "minuteTrackerTasks", Ascending, DateTime<Utc>, created_at);
document_record!(TrackerHistoryEntry, "minuteTrackerHistory", Descending, DateTime<Utc>, timestamp);
document_record!(AttendanceRecord, "attendance", Descending, NaiveDate, date);

impl Record for UserProfile {
    const COLLECTION: &'static str = "users";
    const DIRECTION: SortDirection = SortDirection::Ascending;

    type Id = UserId;
    type Key = String;

    fn id(&self) -> &UserId {
        &self.uid
    }

    fn needs_id(&self) -> bool {
        self.uid.as_str().is_empty()
    }

    fn assign_id(&mut self, id: String) {
        self.uid = UserId::new(id);
    }

    fn order_key(&self) -> String {
        self.name.clone()
    }
}
