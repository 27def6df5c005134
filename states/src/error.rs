use backoffice_services::ServiceError;
use thiserror::Error;

/// A required form field was left empty.
///
/// Validation failures are caller-local: the dialog stays open and the
/// form buffer is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct FormError {
    pub field: &'static str,
}

impl FormError {
    pub fn required(field: &'static str) -> Self {
        Self { field }
    }
}

/// Failure of a store action, after local cleanup (loading flags reset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] FormError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
