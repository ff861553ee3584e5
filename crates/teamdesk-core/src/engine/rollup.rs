//! Tracker completion roll-up and tracker statistics

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::{MinuteTracker, TrackerTask};
use crate::value_objects::{DocumentId, UserId};

/// Non-empty and every child completed
pub fn all_completed(tasks: &[TrackerTask]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|task| task.completed)
}

/// Children of one tracker, in snapshot order
pub fn tasks_of<'a>(tasks: &'a [TrackerTask], tracker_id: &DocumentId) -> Vec<&'a TrackerTask> {
    tasks.iter().filter(|task| task.belongs_to(tracker_id)).collect()
}

/// Session-scoped record of which trackers have been celebrated
///
/// The first snapshot only sets baselines. After that a tracker first seen
/// in a later snapshot counts as not complete, so a coalesced
/// create-then-complete still celebrates. A celebration fires on a
/// transition to all-complete, once per tracker id.
#[derive(Debug, Default)]
pub struct CelebrationTracker {
    last_state: HashMap<DocumentId, bool>,
    celebrated: HashSet<DocumentId>,
    primed: bool,
}

impl CelebrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tracker's current children; true when a celebration fires
    pub fn observe(&mut self, tracker_id: &DocumentId, tasks: &[TrackerTask]) -> bool {
        let complete = all_completed(tasks);
        let was_complete = self
            .last_state
            .insert(tracker_id.clone(), complete)
            .unwrap_or(!self.primed);

        if complete && !was_complete && !self.celebrated.contains(tracker_id) {
            self.celebrated.insert(tracker_id.clone());
            return true;
        }
        false
    }

    /// Feed a full tracker-task snapshot; returns trackers to celebrate
    pub fn observe_snapshot(&mut self, tasks: &[TrackerTask]) -> Vec<DocumentId> {
        let mut grouped: BTreeMap<&DocumentId, Vec<TrackerTask>> = BTreeMap::new();
        for task in tasks {
            grouped.entry(&task.tracker_id).or_default().push(task.clone());
        }

        let fired = grouped
            .into_iter()
            .filter_map(|(tracker_id, children)| {
                self.observe(tracker_id, &children).then(|| tracker_id.clone())
            })
            .collect();
        self.primed = true;
        fired
    }

    #[inline]
    pub fn has_celebrated(&self, tracker_id: &DocumentId) -> bool {
        self.celebrated.contains(tracker_id)
    }
}

/// Totals across every tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummary {
    /// Sum of declared budgets, not of child minutes
    pub total_minutes: u64,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub trackers: usize,
}

pub fn tracker_summary(trackers: &[MinuteTracker], tasks: &[TrackerTask]) -> TrackerSummary {
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    TrackerSummary {
        total_minutes: trackers.iter().map(|t| u64::from(t.total_minutes)).sum(),
        completed_tasks,
        pending_tasks: tasks.len() - completed_tasks,
        trackers: trackers.len(),
    }
}

/// Minutes logged per tracker member, in member order
///
/// Tasks owned by non-members are left out.
pub fn member_minutes(tracker: &MinuteTracker, tasks: &[TrackerTask]) -> Vec<(UserId, u32)> {
    tracker
        .members
        .iter()
        .map(|member| {
            let minutes = tasks
                .iter()
                .filter(|task| task.belongs_to(&tracker.id) && &task.member_id == member)
                .map(|task| task.minutes)
                .sum();
            (member.clone(), minutes)
        })
        .collect()
}
