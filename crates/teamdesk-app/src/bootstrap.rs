//! Workspace setup and the session runner

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use teamdesk_common::AppConfig;
use teamdesk_core::{Notification, Repository};
use teamdesk_service::dto::RecordLoginRequest;
use teamdesk_service::{
    spawn_heartbeat, DashboardSession, LoginHistoryService, PermissionService, ServiceContext,
    TaskService,
};
use teamdesk_store::{JsonExportSink, MemoryIdentityProvider, MemoryStore};

/// Notifications buffered between the session and the logger
const NOTIFICATION_BUFFER: usize = 64;

/// The collaborators behind one running context
pub struct Workspace {
    pub store: MemoryStore,
    pub identity: Arc<MemoryIdentityProvider>,
    pub context: Arc<ServiceContext>,
}

/// Build the store, identity provider and context from configuration
///
/// Every seeded profile gets a verified account so any of them can act.
pub async fn build_workspace(config: &AppConfig) -> anyhow::Result<Workspace> {
    let store = MemoryStore::new();
    if let Some(path) = &config.session.seed_file {
        store
            .load_file(path)
            .await
            .with_context(|| format!("failed to load seed file {}", path.display()))?;
    }

    let identity = Arc::new(MemoryIdentityProvider::new());
    for user in store.users.snapshot().await? {
        identity.register(user.uid, user.email, user.name, user.role, true);
    }

    let context = ServiceContext::builder()
        .user_repo(store.users.clone())
        .task_repo(store.tasks.clone())
        .task_history_repo(store.task_history.clone())
        .login_history_repo(store.login_history.clone())
        .tracker_repo(store.trackers.clone())
        .tracker_task_repo(store.tracker_tasks.clone())
        .tracker_history_repo(store.tracker_history.clone())
        .attendance_repo(store.attendance.clone())
        .identity(identity.clone())
        .export_sink(Arc::new(JsonExportSink::new(config.export.dir.clone())))
        .attendance_policy(config.attendance.policy())
        .presence_policy(config.presence.policy())
        .build()?;

    info!(users = store.users.len(), tasks = store.tasks.len(), "Workspace ready");
    Ok(Workspace {
        store,
        identity,
        context: Arc::new(context),
    })
}

fn log_notification(notification: &Notification) {
    match notification.message() {
        Some(message) => info!(
            event_type = notification.event_type(),
            message = %message,
            "Notification"
        ),
        None => debug!(event_type = notification.event_type(), "Notification"),
    }
}

/// Sign in the acting user and run their session until Ctrl-C
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let acting = config.session.acting_user()?;
    let workspace = build_workspace(&config).await?;
    let ctx = workspace.context.clone();

    workspace
        .identity
        .sign_in(&acting)
        .with_context(|| format!("acting user {acting} has no account"))?;

    let login = LoginHistoryService::new(&ctx)
        .record_login(
            RecordLoginRequest {
                ip_address: None,
                device_info: Some(format!("{} {}", config.app.name, env!("CARGO_PKG_VERSION"))),
            },
            Utc::now(),
        )
        .await?;

    let actor = PermissionService::new(&ctx).actor().await?;
    let overview = TaskService::new(&ctx).overview(Utc::now()).await?;
    info!(
        user_id = %actor.id(),
        overdue = overview.stats.overdue,
        due_soon = overview.stats.due_soon,
        completed = overview.stats.completed,
        total = overview.stats.total,
        "Signed in"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (notify_tx, mut notify_rx) = mpsc::channel(NOTIFICATION_BUFFER);

    let heartbeat = spawn_heartbeat(ctx.clone(), config.heartbeat.interval(), shutdown_rx.clone());
    let session = DashboardSession::for_actor(&actor, ctx.attendance_policy().offset);
    let session = tokio::spawn(session.run(
        workspace.store.tasks.subscribe(),
        workspace.store.tracker_tasks.subscribe(),
        notify_tx,
        shutdown_rx,
    ));
    let logger = tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            log_notification(&notification);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    if shutdown_tx.send(true).is_err() {
        warn!("Background tasks already stopped");
    }
    heartbeat.await?;
    session.await?;
    logger.await?;

    LoginHistoryService::new(&ctx)
        .record_logout(&login.id, Utc::now())
        .await?;
    workspace.identity.sign_out();

    info!("Session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use teamdesk_common::{AppConfig, Environment};
    use teamdesk_core::UserId;
    use teamdesk_service::MemberService;

    const SEED: &str = r#"{
        "users": [
            { "uid": "admin", "name": "Ada", "email": "ada@example.com", "role": "admin",
              "createdAt": "2026-01-01T00:00:00Z" }
        ]
    }"#;

    fn config(seed: &std::path::Path, export_dir: &std::path::Path) -> AppConfig {
        let seed = seed.display().to_string();
        let export_dir = export_dir.display().to_string();
        AppConfig::from_lookup(|name| match name {
            "SEED_FILE" => Some(seed.clone()),
            "EXPORT_DIR" => Some(export_dir.clone()),
            "ACTING_USER_ID" => Some("admin".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_workspace_from_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::File::create(&seed_path)
            .unwrap()
            .write_all(SEED.as_bytes())
            .unwrap();

        let config = config(&seed_path, dir.path());
        assert_eq!(config.app.env, Environment::Development);

        let workspace = build_workspace(&config).await.unwrap();
        assert_eq!(workspace.store.users.len(), 1);

        workspace.identity.sign_in(&UserId::from("admin")).unwrap();
        let members = MemberService::new(&workspace.context).members().await.unwrap();
        assert_eq!(members[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir.path().join("absent.json"), dir.path());

        assert!(build_workspace(&config).await.is_err());
    }
}
