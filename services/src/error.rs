use thiserror::Error;

/// Failure reported by any backing service call.
///
/// `Rejected` carries the optional human-readable message the service
/// attached to the rejection; callers fall back to their own wording when
/// it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{}", message.as_deref().unwrap_or("request rejected"))]
    Rejected { message: Option<String> },

    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    #[error("not found: {id}")]
    NotFound { id: String },
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: Some(message.into()),
        }
    }

    pub fn rejected_silent() -> Self {
        Self::Rejected { message: None }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// The service-provided message, when one was attached.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => message.as_deref(),
            Self::Unavailable { message } => Some(message.as_str()),
            Self::NotFound { .. } => None,
        }
    }
}
