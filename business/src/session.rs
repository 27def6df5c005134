//! Session store: credentials, authenticated profile, derived abilities,
//! and the reset-password flow.
//!
//! The store is a three-phase machine (unauthenticated → authenticating
//! → authenticated) over an atomically-installed credential bundle.
//! Failures during login/register/refresh leave the previous
//! authentication state untouched; logout always succeeds locally no
//! matter what the remote says. Every stable state change persists the
//! snapshot through the injected storage so a process restart
//! rehydrates the session.

use std::sync::{Arc, Mutex};

use backoffice_services::{
    AuthService, AuthSession, AuthenticatedUser, Clock, Credentials, NotificationKind,
    NotificationSink, Permission, RegisterPayload, ResetPasswordPayload, Role, ServiceError,
    SessionStorage, UserProfile,
};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::ResetCountdown;

const FALLBACK_ERROR: &str = "Something went wrong";

/// Authentication phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// What the subject of an ability may be done to. Only management is
/// granted at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityAction {
    Manage,
}

/// A derived authorization capability gating UI access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub action: AbilityAction,
    pub subject: Ustr,
}

impl Ability {
    pub fn manage(subject: impl AsRef<str>) -> Self {
        Self {
            action: AbilityAction::Manage,
            subject: Ustr::from(subject.as_ref()),
        }
    }
}

/// Countdown state of the resend window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordState {
    pub email: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub countdown_seconds: u32,
    pub can_resend: bool,
}

impl Default for ResetPasswordState {
    fn default() -> Self {
        Self {
            email: String::new(),
            requested_at: None,
            countdown_seconds: 60,
            can_resend: false,
        }
    }
}

/// The persisted slots of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: AuthPhase,
    pub credentials: Credentials,
    pub user: UserProfile,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub abilities: Vec<Ability>,
    pub admin_abilities: Vec<Ability>,
    pub workspace_abilities: Vec<Ability>,
}

/// On-disk shape of the session, including the resend window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub state: SessionState,
    pub reset_password: ResetPasswordState,
}

/// State container for the authenticated session.
pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    storage: Arc<dyn SessionStorage>,

    state: SessionState,
    reset_password: Arc<Mutex<ResetPasswordState>>,
    countdown: ResetCountdown,
    resend_window_seconds: u32,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            auth,
            notifier,
            clock,
            storage,
            state: SessionState::default(),
            reset_password: Arc::new(Mutex::new(ResetPasswordState::default())),
            countdown: ResetCountdown::new(),
            resend_window_seconds: 60,
        }
    }

    pub fn with_resend_window(mut self, seconds: u32) -> Self {
        self.resend_window_seconds = seconds;
        self
    }

    /// Builds a store rehydrated from the persisted snapshot, when one
    /// exists and parses.
    pub fn restore(
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let mut store = Self::new(auth, notifier, clock, storage);
        match store.storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<SessionSnapshot>(&raw) {
                Ok(snapshot) => {
                    store.state = snapshot.state;
                    *store
                        .reset_password
                        .lock()
                        .unwrap_or_else(|e| e.into_inner()) = snapshot.reset_password;
                }
                Err(err) => warn!("ignoring unreadable session snapshot: {err}"),
            },
            Ok(None) => {}
            Err(err) => warn!("session snapshot load failed: {err}"),
        }
        store
    }

    /// Authenticates and installs the session.
    ///
    /// On failure the previous authentication state is restored
    /// untouched — no partial credential install — and the error is
    /// returned so the caller can block navigation.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ServiceError> {
        let previous = self.state.phase;
        self.state.phase = AuthPhase::Authenticating;

        match self.auth.login(email, password).await {
            Ok(session) => {
                self.install_session(session);
                self.state.phase = AuthPhase::Authenticated;
                self.persist();
                info!("session authenticated for {}", self.state.user.email);
                Ok(())
            }
            Err(err) => {
                self.state.phase = previous;
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    /// Rotates the credential bundle. Same install contract as login,
    /// but the phase is assumed already authenticated and is not
    /// touched; a failure surfaces without forcing a logout.
    pub async fn refresh_token(&mut self) -> Result<(), ServiceError> {
        match self.auth.refresh_token().await {
            Ok(session) => {
                self.install_session(session);
                self.persist();
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    /// Creates an account and installs its session. The phase is left
    /// alone; the caller decides when the new account counts as a
    /// login.
    pub async fn register(&mut self, payload: &RegisterPayload) -> Result<(), ServiceError> {
        match self.auth.register(payload).await {
            Ok(session) => {
                self.install_session(session);
                self.persist();
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    /// Read-only profile fetch; used for rehydration checks. Mutates
    /// nothing.
    pub async fn get_me(&self) -> Result<AuthenticatedUser, ServiceError> {
        self.auth.current_user().await
    }

    /// Derives the ability list from permission codes.
    ///
    /// Always ends with the catch-all `manage default` entry, including
    /// for an empty permission list.
    pub fn set_abilities(&mut self, permissions: &[Permission]) {
        let mut abilities: Vec<Ability> = permissions
            .iter()
            .map(|permission| Ability {
                action: AbilityAction::Manage,
                subject: *permission,
            })
            .collect();
        abilities.push(Ability::manage("default"));
        self.state.abilities = abilities;
    }

    /// Requests the reset email, then unconditionally restarts the
    /// resend window. A countdown already in flight is cancelled first;
    /// there is never more than one timer.
    pub async fn request_reset_password(&mut self, email: &str) -> Result<(), ServiceError> {
        self.auth.request_reset_password(email).await?;

        {
            let mut reset = self
                .reset_password
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            reset.email = email.to_string();
            reset.requested_at = Some(self.clock.now());
            reset.countdown_seconds = self.resend_window_seconds;
            reset.can_resend = false;
        }
        self.countdown.start(self.reset_password.clone());
        self.persist();
        Ok(())
    }

    pub async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), ServiceError> {
        self.auth.reset_password(payload).await
    }

    pub async fn verify_email(&self, email: &str, token: &str) -> Result<(), ServiceError> {
        match self.auth.verify_email(email, token).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    pub async fn resend_verification_code(&self, email: &str) -> Result<(), ServiceError> {
        match self.auth.resend_verification_code(email).await {
            Ok(message) => {
                self.notifier.notify(&message, NotificationKind::Success);
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    /// Switches the active business unit on the stored profile.
    pub fn set_active_business_unit(&mut self, business_unit_id: impl Into<String>) {
        self.state.user.business_unit_id = Some(business_unit_id.into());
        self.persist();
    }

    /// Ends the session. The remote call is best-effort — a failure is
    /// logged and never propagated — and the local clear is
    /// unconditional.
    pub async fn logout(&mut self) {
        if let Err(err) = self.auth.logout().await {
            error!("logout request failed: {err}");
        }

        self.state.phase = AuthPhase::Unauthenticated;
        self.state.user = UserProfile::default();
        self.state.roles.clear();
        self.state.permissions.clear();
        self.state.credentials.clear();
        self.state.abilities.clear();
        self.state.admin_abilities.clear();
        self.state.workspace_abilities.clear();
        self.persist();
        info!("session cleared");
    }

    fn install_session(&mut self, session: AuthSession) {
        let AuthSession { credentials, user } = session;
        let AuthenticatedUser {
            profile,
            roles,
            permissions,
        } = user;

        self.state.credentials = credentials;
        self.state.user = profile;
        self.state.roles = roles;
        self.set_abilities(&permissions);
        self.state.permissions = permissions;
    }

    fn notify_failure(&self, err: &ServiceError) {
        self.notifier
            .notify(err.message().unwrap_or(FALLBACK_ERROR), NotificationKind::Error);
    }

    fn persist(&self) {
        let snapshot = SessionSnapshot {
            state: self.state.clone(),
            reset_password: self
                .reset_password
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(err) = self.storage.save(&raw) {
                    warn!("session persist failed: {err}");
                }
            }
            Err(err) => warn!("session snapshot serialize failed: {err}"),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.phase == AuthPhase::Authenticated
    }

    pub fn user(&self) -> &UserProfile {
        &self.state.user
    }

    pub fn roles(&self) -> &[Role] {
        &self.state.roles
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.state.permissions
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.state.abilities
    }

    pub fn admin_abilities(&self) -> &[Ability] {
        &self.state.admin_abilities
    }

    pub fn workspace_abilities(&self) -> &[Ability] {
        &self.state.workspace_abilities
    }

    pub fn credentials(&self) -> &Credentials {
        &self.state.credentials
    }

    pub fn reset_password_state(&self) -> ResetPasswordState {
        self.reset_password
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }
}
