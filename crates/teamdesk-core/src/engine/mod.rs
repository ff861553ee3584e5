//! Derivation engine
//!
//! Pure functions over record snapshots. Nothing here performs I/O; every
//! function can be re-run on each pushed snapshot. Session-scoped gates
//! (`UrgencyNotifier`, `CelebrationTracker`, `MilestoneTracker`) are plain
//! values owned by the caller.

pub mod attendance;
pub mod calendar;
pub mod completion;
pub mod insights;
pub mod milestones;
pub mod presence;
pub mod rollup;
pub mod stats;
pub mod urgency;

pub use attendance::{AttendancePolicy, AttendanceState, DEFAULT_LATE_HOUR};
pub use completion::{complete_task, CompletionOutcome};
pub use insights::{completion_trend, tracker_minutes_trend, TrendPoint, TREND_DAYS};
pub use milestones::{Milestone, MilestoneTracker, WEEKLY_MILESTONE_THRESHOLD};
pub use presence::PresencePolicy;
pub use rollup::{
    all_completed, member_minutes, tasks_of, tracker_summary, CelebrationTracker, TrackerSummary,
};
pub use stats::{classify, task_stats, StatsScope, TaskBucket, TaskStats, DUE_SOON_WINDOW_DAYS};
pub use urgency::{urgent_tasks, UrgencyNotice, UrgencyNotifier, URGENT_TASK_LIMIT};
