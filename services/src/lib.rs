//! Service interfaces consumed by the store layer, plus their in-memory
//! implementations.
//!
//! Stores never touch a backing collection directly; they call through the
//! narrow traits defined here (`ResourceService`, `AuthService`,
//! `NotificationSink`, `Clock`, `IdGenerator`, `SessionStorage`). The
//! in-memory implementations back the admin console with mock data and
//! artificial latency, and double as deterministic test fixtures.

mod auth;
mod clock;
mod error;
mod ids;
mod memory;
mod notify;
mod persist;
mod repository;

pub use auth::{
    AuthService, AuthSession, AuthenticatedUser, Credentials, InMemoryRoles, MockAccount,
    MockAuthService, Permission, RegisterPayload, ResetPasswordPayload, Role, RoleDirectory,
    UserProfile,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ServiceError;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use memory::{InMemoryRepository, InsertPosition, Latency};
pub use notify::{ChannelNotifier, LogNotifier, Notification, NotificationKind, NotificationSink};
pub use persist::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use repository::{Record, ResourceService};
