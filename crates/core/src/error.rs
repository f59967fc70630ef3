use crate::catalog::EventStatus;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid {kind} '{value}'")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: EventStatus, to: EventStatus },

    #[error("Duplicate tracking id: {0}")]
    DuplicateTrackingId(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
