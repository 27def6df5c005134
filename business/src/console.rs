//! Composition root: wires the mock services into the per-resource
//! stores and the session store.

use std::sync::Arc;

use backoffice_services::{
    Clock, IdGenerator, InMemoryRepository, InMemoryRoles, InsertPosition, LogNotifier,
    MemorySessionStorage, MockAuthService, NotificationSink, RoleDirectory, SessionStorage,
    SystemClock, UuidIds,
};
use backoffice_states::{Resource, ResourceStore};

use crate::{
    ConsoleConfig, FeatureStore, ModuleStore, PermissionStore, PlanCapabilityStore, SessionStore,
    TenantOverrideStore, UserStore, fixtures,
};

/// The fully-wired state layer of the admin console.
///
/// Each store is independent; the session store is the only one the rest
/// of the application consults for access gating.
pub struct AdminConsole {
    pub modules: ModuleStore,
    pub features: FeatureStore,
    pub permissions: PermissionStore,
    pub plan_capabilities: PlanCapabilityStore,
    pub tenant_overrides: TenantOverrideStore,
    pub users: UserStore,
    pub roles: Arc<dyn RoleDirectory>,
    pub session: SessionStore,
}

impl AdminConsole {
    /// Mock-backed console with log-based notifications and in-memory
    /// session persistence.
    pub fn with_mock_services(config: &ConsoleConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(LogNotifier),
            Arc::new(SystemClock),
            Arc::new(MemorySessionStorage::new()),
        )
    }

    /// Same wiring with the ambient dependencies chosen by the caller.
    pub fn assemble(
        config: &ConsoleConfig,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIds);
        let latency = config.service_latency;

        let auth = Arc::new(
            MockAuthService::new(fixtures::seed_accounts()).with_latency(latency.list),
        );
        let session = SessionStore::restore(auth, notifier.clone(), clock.clone(), storage)
            .with_resend_window(config.resend_window_seconds);

        Self {
            modules: make_store(
                InMemoryRepository::new(fixtures::seed_modules()).with_latency(latency),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            features: make_store(
                InMemoryRepository::new(fixtures::seed_features()).with_latency(latency),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            permissions: make_store(
                InMemoryRepository::new(fixtures::seed_permissions()).with_latency(latency),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            plan_capabilities: make_store(
                InMemoryRepository::new(fixtures::seed_plan_capabilities()).with_latency(latency),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            tenant_overrides: make_store(
                InMemoryRepository::new(fixtures::seed_tenant_overrides()).with_latency(latency),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            // Newest operators first.
            users: make_store(
                InMemoryRepository::new(fixtures::seed_users())
                    .with_latency(latency)
                    .with_insert(InsertPosition::Prepend),
                config,
                &notifier,
                &clock,
                &ids,
            ),
            roles: Arc::new(InMemoryRoles::new(fixtures::seed_roles()).with_latency(latency.list)),
            session,
        }
    }
}

fn make_store<R: Resource>(
    repository: InMemoryRepository<R>,
    config: &ConsoleConfig,
    notifier: &Arc<dyn NotificationSink>,
    clock: &Arc<dyn Clock>,
    ids: &Arc<dyn IdGenerator>,
) -> ResourceStore<R> {
    let mut store = ResourceStore::new(
        Arc::new(repository),
        notifier.clone(),
        clock.clone(),
        ids.clone(),
    );
    store.set_per_page(config.default_per_page);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_states::DialogMode;

    #[tokio::test]
    async fn mock_console_serves_the_seeded_catalog() {
        let mut console = AdminConsole::assemble(
            &ConsoleConfig::for_tests(),
            Arc::new(LogNotifier),
            Arc::new(SystemClock),
            Arc::new(MemorySessionStorage::new()),
        );

        console.modules.fetch().await.expect("fetch modules");
        assert_eq!(console.modules.view().total, 5);

        console.features.fetch().await.expect("fetch features");
        assert_eq!(console.features.view().total, 3);

        let roles = console.roles.list_roles().await.expect("roles");
        assert_eq!(roles.len(), 3);
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in_and_gets_abilities() {
        let mut console = AdminConsole::assemble(
            &ConsoleConfig::for_tests(),
            Arc::new(LogNotifier),
            Arc::new(SystemClock),
            Arc::new(MemorySessionStorage::new()),
        );

        console
            .session
            .login("admin@example.com", "admin123")
            .await
            .expect("login");

        assert!(console.session.is_authenticated());
        // Six permissions plus the default catch-all.
        assert_eq!(console.session.abilities().len(), 7);
    }

    #[tokio::test]
    async fn stores_are_independent() {
        let mut console = AdminConsole::assemble(
            &ConsoleConfig::for_tests(),
            Arc::new(LogNotifier),
            Arc::new(SystemClock),
            Arc::new(MemorySessionStorage::new()),
        );

        console
            .modules
            .open_dialog(DialogMode::Create, None);
        assert!(console.modules.dialog_visible());
        assert!(!console.features.dialog_visible());
        assert!(!console.users.dialog_visible());
    }
}
