//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (storage, notification bus).

use thiserror::Error;
use validator::Validate;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Signup attempted with an email that is already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// Password did not match the stored one
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Action not allowed for the current user
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Run `validator` rules on an input, reporting the first failing field.
pub fn validate_input<T: Validate>(input: &T) -> DomainResult<()> {
    input.validate().map_err(|e| {
        let message = e
            .field_errors()
            .iter()
            .next()
            .map(|(field, errors)| {
                errors
                    .first()
                    .and_then(|error| error.message.as_ref())
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
            .unwrap_or_else(|| "Validation failed".to_string());
        DomainError::Validation(message)
    })
}
