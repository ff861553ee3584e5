mod notification;

pub use notification::{
    MilestoneReachedEvent, Notification, StatsUpdatedEvent, TrackerCompletedEvent, UrgentTasksEvent,
};
