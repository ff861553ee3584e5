//! End-to-end scenarios over the in-memory collaborators
//!
//! Run with: cargo test -p integration-tests --test scenarios

use chrono::Duration;
use integration_tests::*;
use teamdesk_core::engine::StatsScope;
use teamdesk_core::{
    AccessLevel, AttendanceStatus, Notification, Repository, Role, TaskAction, TaskStatus, UserId,
};
use teamdesk_service::dto::{ChangeEmailRequest, CreateUserRequest};
use teamdesk_service::{
    AttendanceService, ExportService, MemberService, ServiceError, TaskService, TrackerService,
};

// ============================================================================
// Task derivations
// ============================================================================

#[tokio::test]
async fn test_urgent_tasks_are_pending_visible_and_ordered() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.add(profile("s1", Role::Student));
    let tasks = TaskService::new(&world.ctx);

    tasks.create_task(task_request(Duration::days(3))).await.unwrap();
    tasks
        .create_task(assigned_task_request(Duration::days(1), &["s2"]))
        .await
        .unwrap();
    tasks.create_task(task_request(Duration::days(2))).await.unwrap();
    tasks.create_task(task_request(-Duration::days(1))).await.unwrap();
    tasks.create_task(task_request(Duration::days(5))).await.unwrap();
    let done = tasks.create_task(task_request(Duration::hours(1))).await.unwrap();

    world.switch_to("s1").unwrap();
    tasks.set_completion(&done.id, true).await.unwrap();

    let overview = tasks.overview(noon()).await.unwrap();
    assert_eq!(overview.urgent.len(), 3);
    assert!(overview
        .urgent
        .iter()
        .all(|task| task.status == TaskStatus::Pending));
    assert!(overview
        .urgent
        .windows(2)
        .all(|pair| pair[0].due_date <= pair[1].due_date));
    assert!(overview
        .urgent
        .iter()
        .all(|task| task.assigned_to.is_empty() || task.assigned_to.contains(&UserId::from("s1"))));
    assert_eq!(overview.urgent[0].due_date, noon() - Duration::days(1));
}

#[tokio::test]
async fn test_stats_partition_visible_set() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.add(profile("s1", Role::Student));
    let tasks = TaskService::new(&world.ctx);

    let due_now = tasks.create_task(task_request(Duration::zero())).await.unwrap();
    tasks.create_task(task_request(-Duration::hours(3))).await.unwrap();
    tasks.create_task(task_request(Duration::days(7))).await.unwrap();
    tasks.create_task(task_request(Duration::days(30))).await.unwrap();
    let done = tasks.create_task(task_request(Duration::days(1))).await.unwrap();
    tasks
        .create_task(assigned_task_request(Duration::days(1), &["someone-else"]))
        .await
        .unwrap();

    world.switch_to("s1").unwrap();
    tasks.set_completion(&done.id, true).await.unwrap();

    let stats = tasks.overview(noon()).await.unwrap().stats;
    assert_eq!(stats.total, 5);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.overdue, 1);
    // due exactly now counts as due soon; due at now + 7 days does not
    assert_eq!(stats.due_soon, 1);
    assert!(stats.completed + stats.overdue + stats.due_soon <= stats.total);

    let cards = tasks.visible_tasks(noon()).await.unwrap();
    let card = cards.iter().find(|card| card.task.id == due_now.id).unwrap();
    assert_eq!(card.bucket.as_str(), "dueSoon");
}

#[tokio::test]
async fn test_unassigned_task_visible_to_every_role() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.add(profile("s1", Role::Student));
    world.add(staff_profile("staff", AccessLevel::Standard));

    let task = TaskService::new(&world.ctx)
        .create_task(task_request(Duration::days(1)))
        .await
        .unwrap();

    for uid in ["admin", "s1", "staff"] {
        world.switch_to(uid).unwrap();
        let cards = TaskService::new(&world.ctx).visible_tasks(noon()).await.unwrap();
        assert!(cards.iter().any(|card| card.task.id == task.id), "{uid} cannot see the task");
    }
}

// ============================================================================
// Completion and the audit trail
// ============================================================================

#[tokio::test]
async fn test_repeat_completion_is_idempotent_but_audited() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.add(profile("s1", Role::Student));
    let tasks = TaskService::new(&world.ctx);
    let task = tasks.create_task(task_request(Duration::days(1))).await.unwrap();

    world.switch_to("s1").unwrap();
    tasks.set_completion(&task.id, true).await.unwrap();
    let after = tasks.set_completion(&task.id, true).await.unwrap().unwrap();
    assert_eq!(after.completed_by, vec![UserId::from("s1")]);
    assert_eq!(after.status, TaskStatus::Completed);

    let history = world.store.task_history.snapshot().await.unwrap();
    let completions = history
        .iter()
        .filter(|entry| entry.action == TaskAction::Completed)
        .count();
    assert_eq!(completions, 2);
}

#[tokio::test]
async fn test_complete_then_uncomplete_restores_membership() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.add(profile("a", Role::Student));
    world.add(profile("b", Role::Student));
    world.add(profile("c", Role::Student));
    let tasks = TaskService::new(&world.ctx);
    let task = tasks.create_task(task_request(Duration::days(1))).await.unwrap();

    for uid in ["a", "c"] {
        world.switch_to(uid).unwrap();
        tasks.set_completion(&task.id, true).await.unwrap();
    }

    world.switch_to("b").unwrap();
    tasks.set_completion(&task.id, true).await.unwrap();
    let restored = tasks.set_completion(&task.id, false).await.unwrap().unwrap();
    assert_eq!(restored.completed_by, vec![UserId::from("a"), UserId::from("c")]);

    world.switch_to("a").unwrap();
    tasks.set_completion(&task.id, false).await.unwrap();
    world.switch_to("c").unwrap();
    let cleared = tasks.set_completion(&task.id, false).await.unwrap().unwrap();
    assert!(cleared.completed_by.is_empty());
    assert_eq!(cleared.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_completing_deleted_task_is_a_no_op() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    let tasks = TaskService::new(&world.ctx);
    let task = tasks.create_task(task_request(Duration::days(1))).await.unwrap();
    tasks.delete_task(&task.id).await.unwrap();
    let history_before = world.store.task_history.len();

    assert!(tasks.set_completion(&task.id, true).await.unwrap().is_none());
    assert!(tasks.delete_task(&task.id).await.unwrap().is_none());
    assert_eq!(world.store.task_history.len(), history_before);
}

// ============================================================================
// Attendance
// ============================================================================

#[tokio::test]
async fn test_attendance_status_follows_the_latest_derivation() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("early", Role::Student)).unwrap();
    let attendance = AttendanceService::new(&world.ctx);

    let record = attendance.clock_in_at(at_hour(8)).await.unwrap();
    assert_eq!(record.status, AttendanceStatus::Present);
    let record = attendance.clock_out_at(at_hour(17)).await.unwrap().unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);

    world.sign_in(profile("late", Role::Staff)).unwrap();
    let record = attendance.clock_in_at(at_hour(9)).await.unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);

    let state = attendance.state_at(at_hour(10)).await.unwrap();
    assert!(state.clocked_in);
    assert_eq!(attendance.records_on(noon().date_naive()).await.unwrap().len(), 2);
}

// ============================================================================
// Trackers and celebrations
// ============================================================================

#[tokio::test]
async fn test_tracker_celebrates_once() {
    let world = TestWorld::new().unwrap();
    world
        .sign_in(staff_profile("staff", AccessLevel::Standard))
        .unwrap();
    world.add(profile("s1", Role::Student));
    let trackers = TrackerService::new(&world.ctx);

    let tracker = trackers
        .create_tracker(tracker_request(&["s1"]))
        .await
        .unwrap();
    let mut children = Vec::new();
    for minutes in [10, 20, 30] {
        let child = trackers
            .add_task(tracker_task_request(tracker.id.as_str(), "s1", minutes))
            .await
            .unwrap()
            .unwrap();
        children.push(child);
    }
    for child in &children[..2] {
        let toggled = trackers.toggle_task(&child.id).await.unwrap().unwrap();
        assert!(!toggled.all_completed);
    }

    let mut session = world.start_session("s1", StatsScope::Personal(UserId::from("s1")));
    session
        .expect(|n| matches!(n, Notification::StatsUpdated(_)))
        .await
        .unwrap();

    let toggled = trackers.toggle_task(&children[2].id).await.unwrap().unwrap();
    assert!(toggled.all_completed);

    let celebrated = session
        .expect(|n| matches!(n, Notification::TrackerCompleted(_)))
        .await
        .unwrap();
    assert!(matches!(
        celebrated,
        Notification::TrackerCompleted(ref event) if event.tracker_id == tracker.id
    ));

    // the same snapshot pushed again must not celebrate twice
    let snapshot = world.store.tracker_tasks.snapshot().await.unwrap();
    world.store.tracker_tasks.seed(snapshot);
    session.settle().await;
    assert!(!session
        .drain()
        .iter()
        .any(|n| matches!(n, Notification::TrackerCompleted(_))));

    let detail = trackers.tracker_detail(&tracker.id).await.unwrap().unwrap();
    assert!(detail.all_completed);
    assert_eq!(detail.member_minutes[0].minutes, 60);
    assert_eq!(detail.tracker.total_minutes, 120);

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_member_toggles_own_tracker_task_only() {
    let world = TestWorld::new().unwrap();
    world
        .sign_in(staff_profile("staff", AccessLevel::Standard))
        .unwrap();
    world.add(profile("s1", Role::Student));
    world.add(profile("s2", Role::Student));
    let trackers = TrackerService::new(&world.ctx);

    let tracker = trackers
        .create_tracker(tracker_request(&["s1", "s2"]))
        .await
        .unwrap();
    let mine = trackers
        .add_task(tracker_task_request(tracker.id.as_str(), "s1", 15))
        .await
        .unwrap()
        .unwrap();
    let theirs = trackers
        .add_task(tracker_task_request(tracker.id.as_str(), "s2", 15))
        .await
        .unwrap()
        .unwrap();

    world.switch_to("s1").unwrap();
    assert!(trackers.toggle_task(&mine.id).await.unwrap().unwrap().task.completed);
    assert!(trackers
        .toggle_task(&theirs.id)
        .await
        .unwrap_err()
        .is_authorization());
}

// ============================================================================
// Authorization, validation and store failures
// ============================================================================

#[tokio::test]
async fn test_task_management_requires_elevated_rights() {
    let world = TestWorld::new().unwrap();
    world.add(profile("s1", Role::Student));
    world.add(staff_profile("standard", AccessLevel::Standard));
    world.add(staff_profile("elevated", AccessLevel::Elevated));
    let tasks = TaskService::new(&world.ctx);

    for uid in ["s1", "standard"] {
        world.switch_to(uid).unwrap();
        let err = tasks
            .create_task(task_request(Duration::days(1)))
            .await
            .unwrap_err();
        assert!(err.is_authorization(), "{uid} was allowed to create a task");
    }
    assert!(world.store.tasks.is_empty());

    world.switch_to("elevated").unwrap();
    let task = tasks.create_task(task_request(Duration::days(1))).await.unwrap();
    assert!(tasks.delete_task(&task.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let world = TestWorld::new().unwrap();
    world
        .sign_in(staff_profile("elevated", AccessLevel::Elevated))
        .unwrap();
    let target = world.add(profile("s1", Role::Student));
    let members = MemberService::new(&world.ctx);

    let err = members.delete_user(&target.uid).await.unwrap_err();
    assert!(err.is_authorization());

    let err = members
        .create_user(CreateUserRequest {
            email: "new@example.com".to_string(),
            password: "secret123".to_string(),
            name: "New".to_string(),
            role: Role::Student,
            position: None,
            student_details: None,
            staff_details: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_authorization());
    assert_eq!(world.store.users.len(), 2);
}

#[tokio::test]
async fn test_validation_runs_before_the_store() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    world.store.tasks.fail_next_writes(1, "should not be reached");

    let mut request = task_request(Duration::days(1));
    request.title = "   ".to_string();
    let err = TaskService::new(&world.ctx)
        .create_task(request)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = TaskService::new(&world.ctx)
        .create_task(task_request(Duration::days(1)))
        .await
        .unwrap_err();
    assert!(err.is_store_failure());
    assert!(world.store.tasks.is_empty());
}

#[tokio::test]
async fn test_failed_email_change_restores_profile() {
    let world = TestWorld::new().unwrap();
    let me = world.sign_in(profile("s1", Role::Student)).unwrap();
    let members = MemberService::new(&world.ctx);

    world.identity.fail_next_email_updates(1);
    let err = members
        .change_email(ChangeEmailRequest {
            email: "new@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(_)));
    assert!(err.is_store_failure());

    let stored = world.store.users.find_by_id(&me.uid).await.unwrap().unwrap();
    assert_eq!(stored.email, me.email);
    assert_eq!(world.identity.email_of(&me.uid).unwrap(), me.email);

    let changed = members
        .change_email(ChangeEmailRequest {
            email: "new@example.com".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(changed.email, "new@example.com");
    assert_eq!(world.identity.verifications_sent(&me.uid), 1);
}

// ============================================================================
// Exports
// ============================================================================

#[tokio::test]
async fn test_admin_exports_task_history() {
    let world = TestWorld::new().unwrap();
    world.sign_in(profile("admin", Role::Admin)).unwrap();
    let tasks = TaskService::new(&world.ctx);
    let task = tasks.create_task(task_request(Duration::days(1))).await.unwrap();
    tasks.set_completion(&task.id, true).await.unwrap();

    let response = ExportService::new(&world.ctx)
        .export_task_history(noon())
        .await
        .unwrap();
    assert_eq!(response.file_name, "Task_History_2026-04-06.xlsx");
    assert_eq!(response.rows, 2);

    let workbook = world.sink.last().unwrap();
    assert_eq!(
        workbook.sheets[0].columns(),
        vec!["Task Title", "User Name", "Action", "Timestamp"]
    );
}
