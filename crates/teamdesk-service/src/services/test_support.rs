//! Shared fixtures for service unit tests

use std::sync::Arc;

use teamdesk_core::{Role, UserId, UserProfile};
use teamdesk_store::{MemoryExportSink, MemoryIdentityProvider, MemoryStore};

use super::context::{ServiceContext, ServiceContextBuilder};

/// Builder with every repository taken from `store`
pub(crate) fn builder_from(store: &MemoryStore) -> ServiceContextBuilder {
    ServiceContext::builder()
        .user_repo(store.users.clone())
        .task_repo(store.tasks.clone())
        .task_history_repo(store.task_history.clone())
        .login_history_repo(store.login_history.clone())
        .tracker_repo(store.trackers.clone())
        .tracker_task_repo(store.tracker_tasks.clone())
        .tracker_history_repo(store.tracker_history.clone())
        .attendance_repo(store.attendance.clone())
}

pub(crate) fn context_with(
    store: MemoryStore,
) -> (
    ServiceContext,
    MemoryStore,
    Arc<MemoryIdentityProvider>,
    Arc<MemoryExportSink>,
) {
    let identity = Arc::new(MemoryIdentityProvider::new());
    let sink = Arc::new(MemoryExportSink::new());
    let ctx = builder_from(&store)
        .identity(identity.clone())
        .export_sink(sink.clone())
        .build()
        .unwrap();
    (ctx, store, identity, sink)
}

/// Register, store and sign in a user with a verified email
pub(crate) fn signed_in(
    store: &MemoryStore,
    identity: &MemoryIdentityProvider,
    uid: &str,
    role: Role,
) -> UserProfile {
    let profile = add_user(store, identity, uid, role);
    identity.sign_in(&profile.uid).unwrap();
    profile
}

/// Register and store a user without signing in
pub(crate) fn add_user(
    store: &MemoryStore,
    identity: &MemoryIdentityProvider,
    uid: &str,
    role: Role,
) -> UserProfile {
    let uid = UserId::from(uid);
    let email = format!("{uid}@example.com");
    let name = format!("User {uid}");
    identity.register(uid.clone(), email.clone(), name.clone(), role, true);
    let profile = UserProfile::new(uid, name, email, role);
    store.users.seed(vec![profile.clone()]);
    profile
}
