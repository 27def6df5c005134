//! Authentication service interface and its in-memory mock.
//!
//! The session store drives login, token rotation, registration, and the
//! reset-password flow exclusively through [`AuthService`]. Payload types
//! mirror the platform's auth responses: a successful login returns the
//! four-part credential bundle plus the user with roles and permissions
//! still embedded; splitting those into separate state slots is the
//! session store's job.

use std::fmt::Debug;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use ustr::Ustr;
use uuid::Uuid;

use crate::ServiceError;

/// A permission code. Interned: permissions are cloned and compared far
/// more often than they are created.
pub type Permission = Ustr;

/// The four-part token set, treated as an atomic unit.
///
/// Either all four fields are empty (unauthenticated) or all four are
/// populated; nothing installs a partial bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token_type: String,
    pub expires_in: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.token_type.is_empty()
            && self.expires_in.is_empty()
            && self.access_token.is_empty()
            && self.refresh_token.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A role attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// The profile fields of an authenticated user, without the embedded
/// role/permission arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub business_unit_id: Option<String>,
}

/// A user as the auth service returns it: profile plus embedded roles and
/// permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Successful login/refresh/register response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub credentials: Credentials,
    pub user: AuthenticatedUser,
}

/// Account-creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Password-reset completion payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordPayload {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Asynchronous authentication service.
///
/// Every call can fail with a [`ServiceError`] carrying an optional
/// human-readable message.
#[async_trait]
pub trait AuthService: Send + Sync + Debug {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError>;

    async fn refresh_token(&self) -> Result<AuthSession, ServiceError>;

    async fn register(&self, payload: &RegisterPayload) -> Result<AuthSession, ServiceError>;

    async fn request_reset_password(&self, email: &str) -> Result<(), ServiceError>;

    async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), ServiceError>;

    async fn verify_email(&self, email: &str, token: &str) -> Result<(), ServiceError>;

    /// Returns the service's confirmation message.
    async fn resend_verification_code(&self, email: &str) -> Result<String, ServiceError>;

    async fn logout(&self) -> Result<(), ServiceError>;

    /// Read-only profile fetch; never mutates credential state.
    async fn current_user(&self) -> Result<AuthenticatedUser, ServiceError>;
}

/// Read-only directory of assignable roles, for the user form.
#[async_trait]
pub trait RoleDirectory: Send + Sync + Debug {
    async fn list_roles(&self) -> Result<Vec<Role>, ServiceError>;
}

/// Fixed role list behind the directory interface.
#[derive(Debug)]
pub struct InMemoryRoles {
    roles: Vec<Role>,
    latency: Duration,
}

impl InMemoryRoles {
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles,
            latency: Duration::from_millis(200),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl RoleDirectory for InMemoryRoles {
    async fn list_roles(&self) -> Result<Vec<Role>, ServiceError> {
        sleep(self.latency).await;
        Ok(self.roles.clone())
    }
}

/// A seeded account the mock service will authenticate.
#[derive(Debug, Clone)]
pub struct MockAccount {
    pub email: String,
    pub password: String,
    pub user: AuthenticatedUser,
}

/// In-memory [`AuthService`] with artificial latency and token rotation.
///
/// Tokens are opaque `access-token-N` strings; each successful login,
/// refresh, or registration bumps the sequence so rotation is observable.
#[derive(Debug)]
pub struct MockAuthService {
    accounts: Mutex<Vec<MockAccount>>,
    active: Mutex<Option<AuthenticatedUser>>,
    latency: Duration,
    token_seq: AtomicU64,
    fail_next: Mutex<Option<ServiceError>>,
}

impl MockAuthService {
    pub fn new(accounts: Vec<MockAccount>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            active: Mutex::new(None),
            latency: Duration::from_millis(300),
            token_seq: AtomicU64::new(0),
            fail_next: Mutex::new(None),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: ServiceError) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    async fn begin(&self) -> Result<(), ServiceError> {
        sleep(self.latency).await;
        match self
            .fail_next
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn issue(&self, user: AuthenticatedUser) -> AuthSession {
        let n = self.token_seq.fetch_add(1, Ordering::Relaxed) + 1;
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
        AuthSession {
            credentials: Credentials {
                token_type: "Bearer".to_string(),
                expires_in: "3600".to_string(),
                access_token: format!("access-token-{n}"),
                refresh_token: format!("refresh-token-{n}"),
            },
            user,
        }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError> {
        self.begin().await?;

        let account = {
            let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            accounts
                .iter()
                .find(|a| a.email == email && a.password == password)
                .cloned()
        };

        match account {
            Some(account) => Ok(self.issue(account.user)),
            None => Err(ServiceError::rejected("Invalid credentials")),
        }
    }

    async fn refresh_token(&self) -> Result<AuthSession, ServiceError> {
        self.begin().await?;

        let user = self
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match user {
            Some(user) => Ok(self.issue(user)),
            None => Err(ServiceError::unavailable("no active session to refresh")),
        }
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<AuthSession, ServiceError> {
        self.begin().await?;

        if payload.password != payload.password_confirmation {
            return Err(ServiceError::rejected("Password confirmation does not match"));
        }

        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.iter().any(|a| a.email == payload.email) {
            return Err(ServiceError::rejected("Email is already registered"));
        }

        let user = AuthenticatedUser {
            profile: UserProfile {
                id: Uuid::new_v4().to_string(),
                name: payload.name.clone(),
                email: payload.email.clone(),
                ..UserProfile::default()
            },
            roles: Vec::new(),
            permissions: Vec::new(),
        };
        accounts.push(MockAccount {
            email: payload.email.clone(),
            password: payload.password.clone(),
            user: user.clone(),
        });
        drop(accounts);

        Ok(self.issue(user))
    }

    async fn request_reset_password(&self, _email: &str) -> Result<(), ServiceError> {
        // The real endpoint accepts unknown addresses without leaking
        // whether an account exists.
        self.begin().await
    }

    async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), ServiceError> {
        self.begin().await?;
        if payload.password != payload.password_confirmation {
            return Err(ServiceError::rejected("Password confirmation does not match"));
        }
        Ok(())
    }

    async fn verify_email(&self, _email: &str, token: &str) -> Result<(), ServiceError> {
        self.begin().await?;
        if token.is_empty() {
            return Err(ServiceError::rejected("Verification token is invalid"));
        }
        Ok(())
    }

    async fn resend_verification_code(&self, _email: &str) -> Result<String, ServiceError> {
        self.begin().await?;
        Ok("Verification code sent".to_string())
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.begin().await?;
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<AuthenticatedUser, ServiceError> {
        self.begin().await?;
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| ServiceError::rejected("Not authenticated"))
    }
}
