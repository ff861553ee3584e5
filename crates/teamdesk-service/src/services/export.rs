//! Export service
//!
//! Flattens collections into sheets and hands them to the export sink.
//! Timestamps are rendered in the configured local offset.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{info, instrument, warn};

use teamdesk_core::engine::member_minutes;
use teamdesk_core::{Capabilities, DocumentId, Row, Sheet, UserId, UserProfile};

use crate::dto::ExportResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;
use super::task::TaskService;

const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
const FILE_DATE: &str = "%Y-%m-%d";
const SHORT_DATE: &str = "%m/%d/%Y";
const SHORT_DATE_TIME: &str = "%m/%d/%Y %-I:%M %p";
const NOT_AVAILABLE: &str = "N/A";

fn row<const N: usize>(cells: [(&str, String); N]) -> Row {
    cells
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

fn name_of(users: &[UserProfile], user_id: &UserId) -> Option<String> {
    users
        .iter()
        .find(|user| &user.uid == user_id)
        .map(|user| user.name.clone())
}

/// Export service
pub struct ExportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExportService<'a> {
    /// Create a new ExportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn offset(&self) -> FixedOffset {
        self.ctx.attendance_policy().offset
    }

    fn local(&self, at: DateTime<Utc>, format: &str) -> String {
        at.with_timezone(&self.offset()).format(format).to_string()
    }

    fn dated_file(&self, name: &str, now: DateTime<Utc>) -> String {
        format!("{name}_{}.xlsx", self.local(now, FILE_DATE))
    }

    async fn write(&self, sheets: Vec<Sheet>, file_name: String) -> ServiceResult<ExportResponse> {
        self.ctx.export_sink().write_workbook(&sheets, &file_name).await?;

        let rows = sheets.iter().map(|sheet| sheet.rows.len()).sum();
        info!(file_name = %file_name, sheets = sheets.len(), rows, "Export written");
        Ok(ExportResponse {
            file_name,
            sheets: sheets.len(),
            rows,
        })
    }

    /// All users (admin)
    #[instrument(skip(self))]
    pub async fn export_users(&self, now: DateTime<Utc>) -> ServiceResult<ExportResponse> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::EXPORT_ALL)
            .await?;

        let users = self.ctx.user_repo().snapshot().await?;
        let rows = users
            .iter()
            .map(|user| {
                row([
                    ("Name", user.name.clone()),
                    ("Email", user.email.clone()),
                    ("Role", user.role.to_string()),
                    ("Position", user.position.to_string()),
                    ("Created At", self.local(user.created_at, DATE_TIME)),
                ])
            })
            .collect();

        self.write(vec![Sheet::with_rows("Users", rows)], self.dated_file("Users", now))
            .await
    }

    /// All tasks (admin)
    #[instrument(skip(self))]
    pub async fn export_tasks(&self, now: DateTime<Utc>) -> ServiceResult<ExportResponse> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::EXPORT_ALL)
            .await?;

        let tasks = self.ctx.task_repo().snapshot().await?;
        let rows = tasks
            .iter()
            .map(|task| {
                let assigned: Vec<&str> = task.assigned_to.iter().map(UserId::as_str).collect();
                row([
                    ("Title", task.title.clone()),
                    ("Description", task.description.clone()),
                    ("Due Date", self.local(task.due_date, DATE_TIME)),
                    ("Priority", task.priority.to_string()),
                    ("Status", task.status.to_string()),
                    ("Assigned To", assigned.join(", ")),
                    ("Completed Count", task.completion_count().to_string()),
                ])
            })
            .collect();

        self.write(vec![Sheet::with_rows("Tasks", rows)], self.dated_file("Tasks", now))
            .await
    }

    /// Task audit trail (admin)
    #[instrument(skip(self))]
    pub async fn export_task_history(&self, now: DateTime<Utc>) -> ServiceResult<ExportResponse> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::EXPORT_ALL)
            .await?;

        let history = self.ctx.task_history_repo().snapshot().await?;
        let rows = history
            .iter()
            .map(|entry| {
                row([
                    ("Task Title", entry.task_title.clone()),
                    ("User Name", entry.user_name.clone()),
                    ("Action", entry.action.to_string()),
                    ("Timestamp", self.local(entry.timestamp, DATE_TIME)),
                ])
            })
            .collect();

        self.write(
            vec![Sheet::with_rows("Task_History", rows)],
            self.dated_file("Task_History", now),
        )
        .await
    }

    /// Login audit trail (admin)
    #[instrument(skip(self))]
    pub async fn export_login_history(&self, now: DateTime<Utc>) -> ServiceResult<ExportResponse> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::EXPORT_ALL)
            .await?;

        let entries = self.ctx.login_history_repo().snapshot().await?;
        let rows = entries
            .iter()
            .map(|entry| {
                let logout = entry.logout_time.map_or_else(
                    || "Still active".to_string(),
                    |at| self.local(at, DATE_TIME),
                );
                let duration = entry
                    .duration_minutes()
                    .map_or_else(|| "Active".to_string(), |minutes| format!("{minutes} min"));
                row([
                    ("User Name", entry.user_name.clone()),
                    ("Email", entry.email.clone()),
                    ("Login Time", self.local(entry.login_time, DATE_TIME)),
                    ("Logout Time", logout),
                    ("Duration", duration),
                    (
                        "IP Address",
                        entry.ip_address.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    ),
                    (
                        "Device Info",
                        entry.device_info.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    ),
                ])
            })
            .collect();

        self.write(
            vec![Sheet::with_rows("Login_History", rows)],
            self.dated_file("Login_History", now),
        )
        .await
    }

    /// Today's visible tasks of the signed-in user
    #[instrument(skip(self))]
    pub async fn export_my_tasks(&self, now: DateTime<Utc>) -> ServiceResult<ExportResponse> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::EXPORT_OWN)
            .await?;

        let tasks = TaskService::new(self.ctx).today_tasks(now).await?;
        let rows = tasks
            .iter()
            .map(|task| {
                let status = if task.is_completed_by(actor.id()) {
                    "Completed by me"
                } else {
                    "Pending"
                };
                row([
                    ("Title", task.title.clone()),
                    ("Description", task.description.clone()),
                    ("Due Date", self.local(task.due_date, SHORT_DATE)),
                    ("Status", status.to_string()),
                    ("Priority", task.priority.to_string()),
                ])
            })
            .collect();

        self.write(
            vec![Sheet::with_rows("My Today Tasks", rows)],
            self.dated_file("My_Tasks", now),
        )
        .await
    }

    /// One tracker with its member summary and tasks
    ///
    /// Members without a profile are left out of the summary sheet.
    #[instrument(skip(self))]
    pub async fn export_tracker(&self, tracker_id: &DocumentId) -> ServiceResult<Option<ExportResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let Some(tracker) = self.ctx.tracker_repo().find_by_id(tracker_id).await? else {
            warn!(tracker_id = %tracker_id, "Tracker vanished before export");
            return Ok(None);
        };

        let users = self.ctx.user_repo().snapshot().await?;
        let tasks: Vec<_> = self
            .ctx
            .tracker_task_repo()
            .snapshot()
            .await?
            .into_iter()
            .filter(|task| task.belongs_to(&tracker.id))
            .collect();

        let created_by = name_of(&users, &tracker.created_by)
            .unwrap_or_else(|| tracker.created_by.to_string());
        let details = [
            ("Date", self.local(tracker.date, SHORT_DATE)),
            ("Total Minutes", tracker.total_minutes.to_string()),
            ("Priority", tracker.priority.to_string()),
            ("Description", tracker.description.clone()),
            ("Created By", created_by),
            ("Created At", self.local(tracker.created_at, SHORT_DATE_TIME)),
            (
                "Task Template",
                tracker
                    .task_template
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
        ]
        .into_iter()
        .map(|(field, value)| row([("Field", field.to_string()), ("Value", value)]))
        .collect();

        let summary = member_minutes(&tracker, &tasks)
            .into_iter()
            .filter_map(|(member_id, minutes)| {
                let member = users.iter().find(|user| user.uid == member_id)?;
                Some(row([
                    ("Name", member.name.clone()),
                    ("Position", member.position.to_string()),
                    ("Total Assigned Minutes", minutes.to_string()),
                ]))
            })
            .collect();

        let detailed = tasks
            .iter()
            .map(|task| {
                let member = name_of(&users, &task.member_id)
                    .unwrap_or_else(|| task.member_id.to_string());
                let status = if task.completed { "Completed" } else { "Pending" };
                row([
                    ("Description", task.description.clone()),
                    ("Member", member),
                    ("Minutes", task.minutes.to_string()),
                    ("Status", status.to_string()),
                ])
            })
            .collect();

        let file_name = format!("TimeTracker_{}.xlsx", self.local(tracker.date, FILE_DATE));
        let sheets = vec![
            Sheet::with_rows("TimeTrackerDetails", details),
            Sheet::with_rows("Assigned Members Summary", summary),
            Sheet::with_rows("Detailed Tasks", detailed),
        ];

        self.write(sheets, file_name).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{add_user, context_with, signed_in};
    use chrono::{Duration, TimeZone};
    use teamdesk_core::{LoginHistoryEntry, MinuteTracker, Priority, Role, Task, TrackerTask};
    use teamdesk_store::MemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_global_exports_require_admin() {
        let (ctx, store, identity, sink) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "staff", Role::Staff);

        let err = ExportService::new(&ctx).export_users(now()).await.unwrap_err();
        assert!(err.is_authorization());
        assert!(sink.written().is_empty());
    }

    #[tokio::test]
    async fn test_users_export_shape() {
        let (ctx, store, identity, sink) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);
        add_user(&store, &identity, "s1", Role::Student);

        let response = ExportService::new(&ctx).export_users(now()).await.unwrap();
        assert_eq!(response.file_name, "Users_2026-03-02.xlsx");
        assert_eq!(response.rows, 2);

        let workbook = sink.last().unwrap();
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name, "Users");
        assert_eq!(sheet.columns(), vec!["Name", "Email", "Role", "Position", "Created At"]);
    }

    #[tokio::test]
    async fn test_login_history_placeholders() {
        let (ctx, store, identity, sink) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);

        let mut closed = LoginHistoryEntry::new(
            UserId::from("admin"),
            "Admin".to_string(),
            "admin@example.com".to_string(),
            now() - Duration::minutes(45),
        );
        closed.end(now());
        let open = LoginHistoryEntry::new(
            UserId::from("admin"),
            "Admin".to_string(),
            "admin@example.com".to_string(),
            now() + Duration::minutes(5),
        );
        store.login_history.seed(vec![closed, open]);

        ExportService::new(&ctx)
            .export_login_history(now())
            .await
            .unwrap();
        let workbook = sink.last().unwrap();
        let sheet = &workbook.sheets[0];

        assert_eq!(sheet.cell(0, "Logout Time"), Some("Still active"));
        assert_eq!(sheet.cell(0, "Duration"), Some("Active"));
        assert_eq!(sheet.cell(0, "IP Address"), Some("N/A"));
        assert_eq!(sheet.cell(1, "Duration"), Some("45 min"));
    }

    #[tokio::test]
    async fn test_my_tasks_export() {
        let (ctx, store, identity, sink) = context_with(MemoryStore::new());
        let me = signed_in(&store, &identity, "s1", Role::Student);

        let mut mine = Task::new(
            "Lab report".to_string(),
            "Chapter 3".to_string(),
            now() + Duration::hours(2),
            Priority::High,
            Vec::new(),
            UserId::from("admin"),
        );
        mine.apply_completion(&me.uid, true);
        let tomorrow = Task::new(
            "Later".to_string(),
            "Not today".to_string(),
            now() + Duration::days(1),
            Priority::Low,
            Vec::new(),
            UserId::from("admin"),
        );
        store.tasks.seed(vec![mine, tomorrow]);

        let response = ExportService::new(&ctx).export_my_tasks(now()).await.unwrap();
        assert_eq!(response.file_name, "My_Tasks_2026-03-02.xlsx");
        assert_eq!(response.rows, 1);

        let workbook = sink.last().unwrap();
        assert_eq!(workbook.sheets[0].name, "My Today Tasks");
        assert_eq!(workbook.sheets[0].cell(0, "Status"), Some("Completed by me"));
        assert_eq!(workbook.sheets[0].cell(0, "Due Date"), Some("03/02/2026"));
    }

    #[tokio::test]
    async fn test_tracker_export() {
        let (ctx, store, identity, sink) = context_with(MemoryStore::new());
        let staff = signed_in(&store, &identity, "staff", Role::Staff);
        add_user(&store, &identity, "s1", Role::Student);

        let mut tracker = MinuteTracker::new(
            now(),
            60,
            Priority::Medium,
            "Inventory".to_string(),
            staff.uid.clone(),
        );
        tracker.id = "tr-1".into();
        tracker.members = vec![UserId::from("s1"), UserId::from("missing")];
        store.trackers.seed(vec![tracker]);

        let mut done = TrackerTask::new("tr-1".into(), UserId::from("s1"), "Count".to_string(), 20);
        done.completed = true;
        let stranger = TrackerTask::new("tr-1".into(), UserId::from("x"), "Help".to_string(), 5);
        store.tracker_tasks.seed(vec![done, stranger]);

        let service = ExportService::new(&ctx);
        let response = service
            .export_tracker(&"tr-1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.file_name, "TimeTracker_2026-03-02.xlsx");
        assert_eq!(response.sheets, 3);

        let workbook = sink.last().unwrap();
        let details = &workbook.sheets[0];
        assert_eq!(details.cell(4, "Value"), Some("User staff"));
        assert_eq!(details.cell(6, "Value"), Some("N/A"));

        let summary = &workbook.sheets[1];
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.cell(0, "Total Assigned Minutes"), Some("20"));

        let detailed = &workbook.sheets[2];
        assert_eq!(detailed.rows.len(), 2);
        assert_eq!(detailed.cell(0, "Status"), Some("Completed"));
        assert_eq!(detailed.cell(1, "Member"), Some("x"));

        assert!(service
            .export_tracker(&"gone".into())
            .await
            .unwrap()
            .is_none());
    }
}
