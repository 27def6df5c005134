//! Domain layer of the admin console's state: concrete entities, their
//! store configurations, and the session store.
//!
//! Every resource store here is a thin [`Resource`] implementation over
//! the generic `ResourceStore`; none of them depends on another store.
//! The session store owns credentials, derived abilities, and the
//! reset-password countdown, and persists itself through the injected
//! storage.
//!
//! [`Resource`]: backoffice_states::Resource

mod catalog;
mod config;
mod console;
mod countdown;
mod fixtures;
mod iam;
mod plans;
mod session;

pub use catalog::{
    AdminFeature, AdminFeatureForm, AdminModule, AdminModuleForm, AdminPermission,
    AdminPermissionForm, EntityStatus, FeatureStore, ModuleRef, ModuleStore, PermissionStore,
};
pub use config::ConsoleConfig;
pub use console::AdminConsole;
pub use countdown::ResetCountdown;
pub use fixtures::{
    seed_accounts, seed_features, seed_modules, seed_permissions, seed_plan_capabilities,
    seed_roles, seed_tenant_overrides, seed_users,
};
pub use iam::{AdminUser, AdminUserForm, UserStatus, UserStore};
pub use plans::{
    OverrideAction, OverrideKind, PlanCapability, PlanCapabilityForm, PlanCapabilityStore,
    TenantOverride, TenantOverrideForm, TenantOverrideStore,
};
pub use session::{
    Ability, AbilityAction, AuthPhase, ResetPasswordState, SessionSnapshot, SessionState,
    SessionStore,
};
