//! Console operators and their roles.

use backoffice_services::{Record, Role};
use backoffice_states::{FormError, Resource, ResourceStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account status. `Suspended` is set by the platform, never through the
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// A console operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable subset of [`AdminUser`]. The role is picked whole from the
/// role directory; the password only travels on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminUserForm {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub password: String,
    pub status: UserStatus,
}

impl Record for AdminUser {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for AdminUser {
    type Form = AdminUserForm;
    const LABEL: &'static str = "User";

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.email]
    }

    fn validate(form: &Self::Form) -> Result<(), FormError> {
        if form.email.trim().is_empty() {
            return Err(FormError::required("email"));
        }
        if form.name.trim().is_empty() {
            return Err(FormError::required("name"));
        }
        if form.role.id.is_empty() {
            return Err(FormError::required("role"));
        }
        Ok(())
    }

    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: form.email.clone(),
            name: form.name.clone(),
            phone: (!form.phone.is_empty()).then(|| form.phone.clone()),
            role: form.role.clone(),
            status: form.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_form(&mut self, form: &Self::Form, now: DateTime<Utc>) {
        self.email = form.email.clone();
        self.name = form.name.clone();
        self.phone = (!form.phone.is_empty()).then(|| form.phone.clone());
        self.role = form.role.clone();
        self.status = form.status;
        self.updated_at = now;
    }

    fn to_form(&self) -> Self::Form {
        AdminUserForm {
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            role: self.role.clone(),
            password: String::new(),
            // The form only offers active/inactive.
            status: match self.status {
                UserStatus::Suspended => UserStatus::Inactive,
                other => other,
            },
        }
    }
}

pub type UserStore = ResourceStore<AdminUser>;
