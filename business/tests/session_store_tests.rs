//! End-to-end tests for the session store against the mock auth service.

use std::sync::Arc;
use std::time::Duration;

use backoffice_business::{Ability, AuthPhase, SessionStore};
use backoffice_services::{
    AuthenticatedUser, ChannelNotifier, ManualClock, MemorySessionStorage, MockAccount,
    MockAuthService, Notification, NotificationKind, Role, ServiceError, SessionStorage,
    UserProfile,
};
use chrono::Utc;
use tokio::time::sleep;
use ustr::Ustr;

fn admin_account() -> MockAccount {
    MockAccount {
        email: "admin@example.com".to_string(),
        password: "admin123".to_string(),
        user: AuthenticatedUser {
            profile: UserProfile {
                id: "user-01".to_string(),
                name: "Ava Chen".to_string(),
                email: "admin@example.com".to_string(),
                ..UserProfile::default()
            },
            roles: vec![Role {
                id: "role-01".to_string(),
                name: "Administrator".to_string(),
            }],
            permissions: vec![Ustr::from("users"), Ustr::from("modules")],
        },
    }
}

struct Fixture {
    session: SessionStore,
    auth: Arc<MockAuthService>,
    storage: Arc<MemorySessionStorage>,
    notifications: flume::Receiver<Notification>,
}

fn fixture() -> Fixture {
    let auth = Arc::new(MockAuthService::new(vec![admin_account()]).with_latency(Duration::ZERO));
    let storage = Arc::new(MemorySessionStorage::new());
    let (notifier, notifications) = ChannelNotifier::unbounded();
    let session = SessionStore::new(
        auth.clone(),
        Arc::new(notifier),
        Arc::new(ManualClock::starting_at(Utc::now())),
        storage.clone(),
    );
    Fixture {
        session,
        auth,
        storage,
        notifications,
    }
}

#[tokio::test]
async fn login_installs_the_session_atomically() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");

    assert_eq!(f.session.phase(), AuthPhase::Authenticated);
    assert!(f.session.is_authenticated());
    assert!(!f.session.credentials().is_empty());
    assert_eq!(f.session.user().name, "Ava Chen");
    // Roles and permissions are split out of the profile payload.
    assert_eq!(f.session.roles().len(), 1);
    assert_eq!(f.session.permissions().len(), 2);
    assert_eq!(
        f.session.abilities(),
        &[
            Ability::manage("users"),
            Ability::manage("modules"),
            Ability::manage("default"),
        ]
    );
}

#[tokio::test]
async fn failed_login_changes_nothing_and_surfaces_the_message() {
    let mut f = fixture();

    let err = f
        .session
        .login("a@b.com", "x")
        .await
        .expect_err("invalid credentials");
    assert_eq!(err, ServiceError::rejected("Invalid credentials"));

    assert_eq!(f.session.phase(), AuthPhase::Unauthenticated);
    assert!(f.session.credentials().is_empty());
    assert!(f.session.abilities().is_empty());

    let note = f.notifications.try_recv().expect("error notification");
    assert_eq!(note.message, "Invalid credentials");
    assert_eq!(note.kind, NotificationKind::Error);
}

#[tokio::test]
async fn failed_relogin_keeps_the_existing_session() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");
    let bundle = f.session.credentials().clone();

    f.session
        .login("admin@example.com", "wrong")
        .await
        .expect_err("rejected");

    assert!(f.session.is_authenticated());
    assert_eq!(f.session.credentials(), &bundle);
}

#[tokio::test]
async fn refresh_rotates_tokens_without_touching_the_phase() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");
    let before = f.session.credentials().access_token.clone();

    f.session.refresh_token().await.expect("refresh");

    assert_eq!(f.session.phase(), AuthPhase::Authenticated);
    assert_ne!(f.session.credentials().access_token, before);
    assert!(!f.session.credentials().is_empty());
}

#[tokio::test]
async fn register_installs_credentials_but_not_the_phase() {
    let mut f = fixture();
    f.session
        .register(&backoffice_services::RegisterPayload {
            name: "New Operator".to_string(),
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            password_confirmation: "pw".to_string(),
        })
        .await
        .expect("register");

    assert_eq!(f.session.phase(), AuthPhase::Unauthenticated);
    assert!(!f.session.credentials().is_empty());
    // An account with no permissions still gets the catch-all ability.
    assert_eq!(f.session.abilities(), &[Ability::manage("default")]);
}

#[tokio::test]
async fn get_me_is_read_only() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");
    let bundle = f.session.credentials().clone();

    let me = f.session.get_me().await.expect("profile");
    assert_eq!(me.profile.name, "Ava Chen");
    assert_eq!(f.session.credentials(), &bundle);
}

#[tokio::test]
async fn logout_clears_locally_even_when_the_remote_call_fails() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");

    f.auth.fail_next(ServiceError::unavailable("auth down"));
    f.session.logout().await;

    assert!(!f.session.is_authenticated());
    assert_eq!(f.session.user(), &UserProfile::default());
    assert!(f.session.credentials().is_empty());
    assert!(f.session.abilities().is_empty());
    assert!(f.session.admin_abilities().is_empty());
    assert!(f.session.workspace_abilities().is_empty());
    assert!(f.session.roles().is_empty());
    assert!(f.session.permissions().is_empty());
}

#[tokio::test]
async fn session_survives_a_restart_through_storage() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");
    let bundle = f.session.credentials().clone();

    // A new process: same storage, fresh store.
    let (notifier, _rx) = ChannelNotifier::unbounded();
    let restored = SessionStore::restore(
        f.auth.clone(),
        Arc::new(notifier),
        Arc::new(ManualClock::starting_at(Utc::now())),
        f.storage.clone(),
    );

    assert!(restored.is_authenticated());
    assert_eq!(restored.credentials(), &bundle);
    assert_eq!(restored.user().name, "Ava Chen");
    assert_eq!(restored.abilities().len(), 3);
}

#[tokio::test]
async fn restore_with_empty_storage_starts_unauthenticated() {
    let (notifier, _rx) = ChannelNotifier::unbounded();
    let storage: Arc<MemorySessionStorage> = Arc::new(MemorySessionStorage::new());
    let restored = SessionStore::restore(
        Arc::new(MockAuthService::new(Vec::new()).with_latency(Duration::ZERO)),
        Arc::new(notifier),
        Arc::new(ManualClock::starting_at(Utc::now())),
        storage,
    );
    assert_eq!(restored.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn restore_ignores_a_corrupt_snapshot() {
    let storage = Arc::new(MemorySessionStorage::new());
    storage.save("not json at all").expect("save");

    let (notifier, _rx) = ChannelNotifier::unbounded();
    let restored = SessionStore::restore(
        Arc::new(MockAuthService::new(Vec::new()).with_latency(Duration::ZERO)),
        Arc::new(notifier),
        Arc::new(ManualClock::starting_at(Utc::now())),
        storage,
    );
    assert_eq!(restored.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test(start_paused = true)]
async fn reset_password_countdown_runs_the_full_window() {
    let mut f = fixture();
    f.session
        .request_reset_password("admin@example.com")
        .await
        .expect("request");

    let reset = f.session.reset_password_state();
    assert_eq!(reset.email, "admin@example.com");
    assert_eq!(reset.countdown_seconds, 60);
    assert!(!reset.can_resend);
    assert!(reset.requested_at.is_some());
    assert!(f.session.countdown_running());

    sleep(Duration::from_millis(61_000)).await;

    let reset = f.session.reset_password_state();
    assert_eq!(reset.countdown_seconds, 0);
    assert!(reset.can_resend);
    assert!(!f.session.countdown_running());
}

#[tokio::test(start_paused = true)]
async fn repeated_reset_requests_share_a_single_timer() {
    let mut f = fixture();
    f.session
        .request_reset_password("admin@example.com")
        .await
        .expect("first request");
    sleep(Duration::from_millis(10_200)).await;

    f.session
        .request_reset_password("admin@example.com")
        .await
        .expect("second request");
    sleep(Duration::from_millis(30_200)).await;

    // Only the second timer may decrement; two timers would have burned
    // through most of the window by now.
    let reset = f.session.reset_password_state();
    assert_eq!(reset.countdown_seconds, 30);
    assert!(!reset.can_resend);
}

#[tokio::test]
async fn resend_verification_code_reports_the_service_message() {
    let f = fixture();
    f.session
        .resend_verification_code("admin@example.com")
        .await
        .expect("resend");

    let note = f.notifications.try_recv().expect("success notification");
    assert_eq!(note.message, "Verification code sent");
    assert_eq!(note.kind, NotificationKind::Success);
}

#[tokio::test]
async fn switching_business_unit_persists() {
    let mut f = fixture();
    f.session
        .login("admin@example.com", "admin123")
        .await
        .expect("login");

    f.session.set_active_business_unit("bu-42");
    assert_eq!(f.session.user().business_unit_id.as_deref(), Some("bu-42"));

    let (notifier, _rx) = ChannelNotifier::unbounded();
    let restored = SessionStore::restore(
        f.auth.clone(),
        Arc::new(notifier),
        Arc::new(ManualClock::starting_at(Utc::now())),
        f.storage.clone(),
    );
    assert_eq!(
        restored.user().business_unit_id.as_deref(),
        Some("bu-42")
    );
}
