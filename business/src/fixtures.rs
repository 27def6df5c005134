//! Seed data for the in-memory services.
//!
//! These are the records the console starts with when backed by the mock
//! services; ids are stable so tests can reference them.

use backoffice_services::{AuthenticatedUser, MockAccount, Role, UserProfile};
use chrono::{DateTime, TimeZone, Utc};
use ustr::Ustr;

use crate::{
    AdminFeature, AdminModule, AdminPermission, AdminUser, EntityStatus, ModuleRef, OverrideAction,
    OverrideKind, PlanCapability, TenantOverride, UserStatus,
};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn seed_modules() -> Vec<AdminModule> {
    let specs: [(&str, &str, &str, &str, EntityStatus); 5] = [
        ("mod-01", "dashboard", "Dashboard", "tabler-layout-dashboard", EntityStatus::Active),
        ("mod-02", "iam", "Identity & Access", "tabler-users", EntityStatus::Active),
        ("mod-03", "billing", "Billing", "tabler-credit-card", EntityStatus::Active),
        ("mod-04", "reports", "Reports", "tabler-chart-bar", EntityStatus::Beta),
        ("mod-05", "archive", "Archive", "tabler-archive", EntityStatus::Inactive),
    ];

    specs
        .into_iter()
        .enumerate()
        .map(|(i, (id, code, name, icon, status))| AdminModule {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            description: format!("{name} module"),
            icon: icon.to_string(),
            status,
            sort_order: (i + 1) as u32,
            created_at: day(2024, 1, 15),
            updated_at: day(2024, 1, 15),
        })
        .collect()
}

pub fn seed_features() -> Vec<AdminFeature> {
    let iam = ModuleRef {
        id: "mod-02".to_string(),
        name: "Identity & Access".to_string(),
    };
    let billing = ModuleRef {
        id: "mod-03".to_string(),
        name: "Billing".to_string(),
    };

    vec![
        AdminFeature {
            id: "feat-01".to_string(),
            module: iam.clone(),
            code: "user-invites".to_string(),
            name: "User invites".to_string(),
            description: "Invite operators by email".to_string(),
            status: EntityStatus::Active,
            created_at: day(2024, 2, 1),
        },
        AdminFeature {
            id: "feat-02".to_string(),
            module: iam,
            code: "sso".to_string(),
            name: "Single sign-on".to_string(),
            description: "SAML and OIDC login".to_string(),
            status: EntityStatus::Beta,
            created_at: day(2024, 2, 10),
        },
        AdminFeature {
            id: "feat-03".to_string(),
            module: billing,
            code: "invoices".to_string(),
            name: "Invoices".to_string(),
            description: "Monthly invoice generation".to_string(),
            status: EntityStatus::Active,
            created_at: day(2024, 2, 20),
        },
    ]
}

pub fn seed_permissions() -> Vec<AdminPermission> {
    [
        ("perm-01", "users.read", "View users", "iam"),
        ("perm-02", "users.write", "Manage users", "iam"),
        ("perm-03", "billing.manage", "Manage billing", "billing"),
        ("perm-04", "reports.view", "View reports", "reports"),
    ]
    .into_iter()
    .map(|(id, code, name, module)| AdminPermission {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        module: module.to_string(),
        description: String::new(),
        created_at: day(2024, 1, 20),
    })
    .collect()
}

pub fn seed_plan_capabilities() -> Vec<PlanCapability> {
    [
        ("cap-01", "starter", "Starter", "dashboard", true, None),
        ("cap-02", "starter", "Starter", "iam", true, Some(5)),
        ("cap-03", "pro", "Pro", "iam", true, Some(50)),
        ("cap-04", "pro", "Pro", "billing", true, None),
        ("cap-05", "starter", "Starter", "reports", false, None),
    ]
    .into_iter()
    .map(
        |(id, plan_code, plan_name, module_code, enabled, usage_limit)| PlanCapability {
            id: id.to_string(),
            plan_code: plan_code.to_string(),
            plan_name: plan_name.to_string(),
            module_code: module_code.to_string(),
            enabled,
            usage_limit,
            created_at: day(2024, 3, 1),
        },
    )
    .collect()
}

pub fn seed_tenant_overrides() -> Vec<TenantOverride> {
    vec![
        TenantOverride {
            id: "ovr-01".to_string(),
            company_id: "acme".to_string(),
            kind: OverrideKind::Module,
            target_id: "mod-04".to_string(),
            action: OverrideAction::Add,
            reason: "Early access to reports".to_string(),
            expires_at: Some(day(2026, 1, 1)),
            created_at: day(2024, 4, 2),
        },
        TenantOverride {
            id: "ovr-02".to_string(),
            company_id: "globex".to_string(),
            kind: OverrideKind::Limit,
            target_id: "cap-02".to_string(),
            action: OverrideAction::Modify,
            reason: "Seat limit raised during migration".to_string(),
            expires_at: None,
            created_at: day(2024, 4, 9),
        },
    ]
}

pub fn seed_roles() -> Vec<Role> {
    vec![
        Role {
            id: "role-01".to_string(),
            name: "Administrator".to_string(),
        },
        Role {
            id: "role-02".to_string(),
            name: "Operator".to_string(),
        },
        Role {
            id: "role-03".to_string(),
            name: "Viewer".to_string(),
        },
    ]
}

pub fn seed_users() -> Vec<AdminUser> {
    let roles = seed_roles();
    let specs: [(&str, &str, &str, usize, UserStatus); 5] = [
        ("user-01", "Ava Chen", "ava@example.com", 0, UserStatus::Active),
        ("user-02", "Noah Patel", "noah@example.com", 1, UserStatus::Active),
        ("user-03", "Mia Ortiz", "mia@example.com", 1, UserStatus::Inactive),
        ("user-04", "Leo Novak", "leo@example.com", 2, UserStatus::Active),
        ("user-05", "Zoe Adeyemi", "zoe@example.com", 2, UserStatus::Suspended),
    ];

    specs
        .into_iter()
        .map(|(id, name, email, role_idx, status)| AdminUser {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            phone: None,
            role: roles[role_idx].clone(),
            status,
            created_at: day(2024, 5, 6),
            updated_at: day(2024, 5, 6),
        })
        .collect()
}

/// Accounts the mock auth service signs in. The admin account carries
/// the permission set the console's abilities derive from.
pub fn seed_accounts() -> Vec<MockAccount> {
    vec![MockAccount {
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
            permissions: vec![
                Ustr::from("modules"),
                Ustr::from("features"),
                Ustr::from("permissions"),
                Ustr::from("users"),
                Ustr::from("plans"),
                Ustr::from("overrides"),
            ],
        },
    }]
}
