//! System-catalog entities: modules, features, permissions.

use backoffice_services::Record;
use backoffice_states::{FormError, Resource, ResourceStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status shared by catalog entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
    Beta,
}

/// A top-level product module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminModule {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub status: EntityStatus,
    pub sort_order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable subset of [`AdminModule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminModuleForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub status: EntityStatus,
}

impl Default for AdminModuleForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            icon: "tabler-box".to_string(),
            status: EntityStatus::Active,
        }
    }
}

impl Record for AdminModule {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for AdminModule {
    type Form = AdminModuleForm;
    const LABEL: &'static str = "Module";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.code, &self.name]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.code.trim().is_empty() {
            return Err(FormError::required("code"));
        }
        if form.name.trim().is_empty() {
            return Err(FormError::required("name"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            code: form.code.clone(),
            name: form.name.clone(),
            description: form.description.clone(),
            icon: form.icon.clone(),
            status: form.status,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, now: DateTime<Utc>) {
        self.code = form.code.clone();
        self.name = form.name.clone();
        self.description = form.description.clone();
        self.icon = form.icon.clone();
        self.status = form.status;
        self.updated_at = now;
    }

    fn to_form(&self) -> Self::Form {
        AdminModuleForm {
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            status: self.status,
        }
    }
}

pub type ModuleStore = ResourceStore<AdminModule>;

/// Typed reference to a parent module, carried whole so the store never
/// resolves names across collections at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    pub id: String,
    pub name: String,
}

impl ModuleRef {
    pub fn of(module: &AdminModule) -> Self {
        Self {
            id: module.id.clone(),
            name: module.name.clone(),
        }
    }
}

/// A feature inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminFeature {
    pub id: String,
    pub module: ModuleRef,
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

/// Editable subset of [`AdminFeature`]; the module is picked from the
/// module list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminFeatureForm {
    pub module: ModuleRef,
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
}

impl Record for AdminFeature {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for AdminFeature {
    type Form = AdminFeatureForm;
    const LABEL: &'static str = "Feature";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.code, &self.name, &self.module.name]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.module.id.is_empty() {
            return Err(FormError::required("module"));
        }
        if form.code.trim().is_empty() {
            return Err(FormError::required("code"));
        }
        if form.name.trim().is_empty() {
            return Err(FormError::required("name"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            module: form.module.clone(),
            code: form.code.clone(),
            name: form.name.clone(),
            description: form.description.clone(),
            status: form.status,
            created_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, _now: DateTime<Utc>) {
        self.module = form.module.clone();
        self.code = form.code.clone();
        self.name = form.name.clone();
        self.description = form.description.clone();
        self.status = form.status;
    }

    fn to_form(&self) -> Self::Form {
        AdminFeatureForm {
            module: self.module.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

pub type FeatureStore = ResourceStore<AdminFeature>;

/// A grantable permission code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPermission {
    pub id: String,
    pub code: String,
    pub name: String,
    pub module: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPermissionForm {
    pub code: String,
    pub name: String,
    pub module: String,
    pub description: String,
}

impl Record for AdminPermission {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for AdminPermission {
    type Form = AdminPermissionForm;
    const LABEL: &'static str = "Permission";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.code, &self.name, &self.module]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.code.trim().is_empty() {
            return Err(FormError::required("code"));
        }
        if form.name.trim().is_empty() {
            return Err(FormError::required("name"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            code: form.code.clone(),
            name: form.name.clone(),
            module: form.module.clone(),
            description: form.description.clone(),
            created_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, _now: DateTime<Utc>) {
        self.code = form.code.clone();
        self.name = form.name.clone();
        self.module = form.module.clone();
        self.description = form.description.clone();
    }

    fn to_form(&self) -> Self::Form {
        AdminPermissionForm {
            code: self.code.clone(),
            name: self.name.clone(),
            module: self.module.clone(),
            description: self.description.clone(),
        }
    }
}

pub type PermissionStore = ResourceStore<AdminPermission>;
