//! Plan capabilities and per-tenant capability overrides.

use backoffice_services::Record;
use backoffice_states::{FormError, Resource, ResourceStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A capability a subscription plan grants for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCapability {
    pub id: String,
    pub plan_code: String,
    pub plan_name: String,
    pub module_code: String,
    pub enabled: bool,
    pub usage_limit: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCapabilityForm {
    pub plan_code: String,
    pub plan_name: String,
    pub module_code: String,
    pub enabled: bool,
    pub usage_limit: Option<u32>,
}

impl Default for PlanCapabilityForm {
    fn default() -> Self {
        Self {
            plan_code: String::new(),
            plan_name: String::new(),
            module_code: String::new(),
            enabled: true,
            usage_limit: None,
        }
    }
}

impl Record for PlanCapability {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for PlanCapability {
    type Form = PlanCapabilityForm;
    const LABEL: &'static str = "Plan capability";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.plan_code, &self.plan_name, &self.module_code]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.plan_code.trim().is_empty() {
            return Err(FormError::required("plan code"));
        }
        if form.module_code.trim().is_empty() {
            return Err(FormError::required("module code"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            plan_code: form.plan_code.clone(),
            plan_name: form.plan_name.clone(),
            module_code: form.module_code.clone(),
            enabled: form.enabled,
            usage_limit: form.usage_limit,
            created_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, _now: DateTime<Utc>) {
        self.plan_code = form.plan_code.clone();
        self.plan_name = form.plan_name.clone();
        self.module_code = form.module_code.clone();
        self.enabled = form.enabled;
        self.usage_limit = form.usage_limit;
    }

    fn to_form(&self) -> Self::Form {
        PlanCapabilityForm {
            plan_code: self.plan_code.clone(),
            plan_name: self.plan_name.clone(),
            module_code: self.module_code.clone(),
            enabled: self.enabled,
            usage_limit: self.usage_limit,
        }
    }
}

pub type PlanCapabilityStore = ResourceStore<PlanCapability>;

/// What a tenant override targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    #[default]
    Module,
    Feature,
    Permission,
    Limit,
}

/// How the override changes the targeted capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideAction {
    #[default]
    Add,
    Remove,
    Modify,
}

/// A per-tenant exception to what the plan would normally allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantOverride {
    pub id: String,
    pub company_id: String,
    pub kind: OverrideKind,
    pub target_id: String,
    pub action: OverrideAction,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantOverrideForm {
    pub company_id: String,
    pub kind: OverrideKind,
    pub target_id: String,
    pub action: OverrideAction,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Record for TenantOverride {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for TenantOverride {
    type Form = TenantOverrideForm;
    const LABEL: &'static str = "Tenant override";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.company_id, &self.target_id, &self.reason]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.company_id.trim().is_empty() {
            return Err(FormError::required("company"));
        }
        if form.target_id.trim().is_empty() {
            return Err(FormError::required("target"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            company_id: form.company_id.clone(),
            kind: form.kind,
            target_id: form.target_id.clone(),
            action: form.action,
            reason: form.reason.clone(),
            expires_at: form.expires_at,
            created_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, _now: DateTime<Utc>) {
        self.company_id = form.company_id.clone();
        self.kind = form.kind;
        self.target_id = form.target_id.clone();
        self.action = form.action;
        self.reason = form.reason.clone();
        self.expires_at = form.expires_at;
    }

    fn to_form(&self) -> Self::Form {
        TenantOverrideForm {
            company_id: self.company_id.clone(),
            kind: self.kind,
            target_id: self.target_id.clone(),
            action: self.action,
            reason: self.reason.clone(),
            expires_at: self.expires_at,
        }
    }
}

pub type TenantOverrideStore = ResourceStore<TenantOverride>;
